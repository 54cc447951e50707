// 定时通知调度器
//
// 持有一个 tokio 后台任务，按固定间隔生成通知并发布到事件总线

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::infrastructure::{AppEvent, EventBus};
use crate::modules::notification::application::MissYouGenerator;

/// 通知调度器
pub struct NotificationScheduler {
    generator: Arc<MissYouGenerator>,
    event_bus: Arc<EventBus>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationScheduler {
    pub fn new(generator: Arc<MissYouGenerator>, event_bus: Arc<EventBus>, interval: Duration) -> Self {
        Self {
            generator,
            event_bus,
            interval,
            task: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 启动定时任务；已有任务时先替换
    ///
    /// 第一次通知在一个完整间隔之后；间隔为零或大到无法计时则不启动，返回 false
    pub fn schedule(&self) -> bool {
        let generator = self.generator.clone();
        let event_bus = self.event_bus.clone();
        let period = self.interval;

        // 前两个刻度都必须可表示
        let now = Instant::now();
        let schedulable = !period.is_zero()
            && period
                .checked_mul(2)
                .and_then(|span| now.checked_add(span))
                .is_some();
        if !schedulable {
            warn!("Notification interval {:?} is not schedulable", period);
            return false;
        }
        let start = now + period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let text = generator.generate().await;
                debug!("Publishing scheduled notification");
                event_bus.publish(AppEvent::MissYou(text));
            }
        });

        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.replace(handle) {
            previous.abort();
            debug!("Replaced existing notification task");
        }
        info!("Notifications scheduled every {:?}", period);
        true
    }

    /// 停止定时任务，返回是否有任务被停止
    pub fn cancel(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        match task.take() {
            Some(handle) => {
                handle.abort();
                info!("Notifications cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        task.as_ref().map(|handle| !handle.is_finished()).unwrap_or(false)
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}
