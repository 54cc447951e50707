use super::super::entities::Message;

/// 发送路径读取的最近消息数
pub const DEFAULT_CONTEXT_WINDOW: usize = 40;

/// 配置错误提示中的哨兵片段
///
/// 含有这些片段的消息是系统合成的初始化错误，不能进入模型上下文
pub const CONFIG_ERROR_SENTINELS: [&str; 2] = ["API key not configured", "FATAL on init"];

/// 对话窗口
///
/// 领域服务：从最近 N 条消息中剔除配置错误提示，得到发送给补全客户端的历史
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    limit: usize,
}

impl Default for ConversationWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

impl ConversationWindow {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// 需要从存储读取的消息数
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 判断文本是否为合成的配置错误提示
    pub fn is_config_error(text: &str) -> bool {
        CONFIG_ERROR_SENTINELS
            .iter()
            .any(|sentinel| text.contains(sentinel))
    }

    /// 过滤最近消息（输入需按时间顺序）
    pub fn select(&self, recent: Vec<Message>) -> Vec<Message> {
        let start = recent.len().saturating_sub(self.limit);
        recent
            .into_iter()
            .skip(start)
            .filter(|msg| !Self::is_config_error(msg.text()))
            .collect()
    }
}
