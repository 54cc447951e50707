use tokio::sync::broadcast;

/// 应用事件
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// 定时生成的"想你了"通知
    MissYou(String),
    /// 会话初始化失败（内容为写入对话的提示）
    SessionFailed(String),
    ConversationCleared,
}

pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// 发布事件；没有订阅者时直接丢弃
    pub fn publish(&self, event: AppEvent) {
        tracing::debug!("[EventBus] Publishing event: {:?}", event);
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
