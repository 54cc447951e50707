// 实时视图的增量游标
//
// watch 通道会合并相邻的更新，订阅者可能只看到“清空 + 若干追加”之后的状态，
// 因此按消息 ID 而不是序列长度判断哪些消息尚未展示

use super::super::entities::Message;
use super::super::value_objects::MessageId;

/// 一次快照相对上次展示的变化
#[derive(Debug, PartialEq, Eq)]
pub struct TranscriptUpdate<'a> {
    /// 上次展示过的消息已不在快照中
    pub cleared: bool,
    /// 尚未展示的消息，按时间顺序
    pub fresh: &'a [Message],
}

/// 记录最后展示的消息 ID
///
/// 存储分配的 ID 单调递增且清空后不回退
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptCursor {
    last_shown: Option<MessageId>,
}

impl TranscriptCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_shown(&self) -> Option<MessageId> {
        self.last_shown
    }

    /// 根据最新快照推进游标
    pub fn advance<'a>(&mut self, snapshot: &'a [Message]) -> TranscriptUpdate<'a> {
        let cleared = match self.last_shown {
            Some(last) => !snapshot.iter().any(|m| m.id() == last),
            None => false,
        };

        let start = match self.last_shown {
            Some(last) => snapshot.partition_point(|m| m.id() <= last),
            None => 0,
        };
        let fresh = &snapshot[start..];

        if let Some(newest) = fresh.last() {
            self.last_shown = Some(newest.id());
        } else if cleared {
            self.last_shown = None;
        }

        TranscriptUpdate { cleared, fresh }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::NewMessage;
    use chrono::Utc;

    fn msg(id: i64, text: &str) -> Message {
        NewMessage::user(text).into_message(MessageId::new(id), Utc::now())
    }

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.text()).collect()
    }

    #[test]
    fn test_prints_only_new_messages() {
        let mut cursor = TranscriptCursor::new();

        let first = vec![msg(1, "hey")];
        let update = cursor.advance(&first);
        assert!(!update.cleared);
        assert_eq!(texts(update.fresh), vec!["hey"]);

        let second = vec![msg(1, "hey"), msg(2, "sup")];
        let update = cursor.advance(&second);
        assert!(!update.cleared);
        assert_eq!(texts(update.fresh), vec!["sup"]);
        assert_eq!(cursor.last_shown(), Some(MessageId::new(2)));
    }

    #[test]
    fn test_clear_merged_with_same_number_of_appends() {
        let mut cursor = TranscriptCursor::new();
        cursor.advance(&[msg(1, "hey"), msg(2, "sup")]);

        // 清空后又追加了两条，长度与之前相同
        let after = vec![msg(3, "hi again"), msg(4, "hello!")];
        let update = cursor.advance(&after);
        assert!(update.cleared);
        assert_eq!(texts(update.fresh), vec!["hi again", "hello!"]);
    }

    #[test]
    fn test_clear_merged_with_more_appends() {
        let mut cursor = TranscriptCursor::new();
        cursor.advance(&[msg(1, "hey")]);

        let after = vec![msg(2, "a"), msg(3, "b"), msg(4, "c")];
        let update = cursor.advance(&after);
        assert!(update.cleared);
        assert_eq!(update.fresh.len(), 3);
    }

    #[test]
    fn test_plain_clear_then_new_message() {
        let mut cursor = TranscriptCursor::new();
        cursor.advance(&[msg(1, "hey"), msg(2, "sup")]);

        let update = cursor.advance(&[]);
        assert!(update.cleared);
        assert!(update.fresh.is_empty());
        assert_eq!(cursor.last_shown(), None);

        // 清空后第一条消息不再视为清空
        let binding = [msg(3, "back")];
        let update = cursor.advance(&binding);
        assert!(!update.cleared);
        assert_eq!(texts(update.fresh), vec!["back"]);
    }

    #[test]
    fn test_repeated_snapshot_is_empty_update() {
        let mut cursor = TranscriptCursor::new();
        let snapshot = vec![msg(1, "hey")];
        cursor.advance(&snapshot);

        let update = cursor.advance(&snapshot);
        assert!(!update.cleared);
        assert!(update.fresh.is_empty());
    }
}
