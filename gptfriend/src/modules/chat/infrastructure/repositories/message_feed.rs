// 消息实时视图
//
// 基于 watch 通道发布完整消息序列，订阅者无需轮询

use futures::stream;
use tokio::sync::watch;

use crate::modules::chat::domain::Message;
use crate::modules::chat::ports::MessageStream;

/// 消息序列广播器
///
/// 由存储在持有写锁时更新，保证订阅者看到的顺序与存储一致
pub(crate) struct MessageFeed {
    sender: watch::Sender<Vec<Message>>,
}

impl MessageFeed {
    pub(crate) fn new(initial: Vec<Message>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// 追加一条消息
    pub(crate) fn push(&self, message: Message) {
        self.sender.send_modify(|messages| messages.push(message));
    }

    /// 清空序列
    pub(crate) fn reset(&self) {
        self.sender.send_replace(Vec::new());
    }

    /// 订阅：先产出当前序列，之后每次变化产出最新序列
    ///
    /// 丢弃返回的流不会影响存储
    pub(crate) fn subscribe(&self) -> MessageStream {
        let mut receiver = self.sender.subscribe();
        let initial = receiver.borrow_and_update().clone();

        Box::pin(stream::unfold(
            (receiver, Some(initial)),
            |(mut receiver, pending)| async move {
                if let Some(current) = pending {
                    return Some((current, (receiver, None)));
                }

                // 发送端随存储一起释放时结束流
                receiver.changed().await.ok()?;
                let current = receiver.borrow_and_update().clone();
                Some((current, (receiver, None)))
            },
        ))
    }
}
