// 定时通知使用的提示词与文本处理

use crate::modules::chat::domain::Message;

/// 语言检测使用的历史消息数
pub const LANGUAGE_SAMPLE_SIZE: usize = 10;

/// 无法判断语言时使用的默认值
pub const DEFAULT_LANGUAGE: &str = "English";

pub const LANGUAGE_DETECTION_SYSTEM_PROMPT: &str =
    "You are a language detection expert. Answer with only the name of the language in one word.";

pub const MISS_YOU_REQUEST: &str = "Generate a short miss you message";

/// 语言检测请求
///
/// 历史按 `User: ...` / `Assistant: ...` 逐行列出
pub fn language_detection_request(messages: &[Message]) -> String {
    let transcript = messages
        .iter()
        .map(|msg| format!("{}: {}", msg.sender().label(), msg.text()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Deduce the language of this conversation: \n\n{}\n\nUse only one word.",
        transcript
    )
}

/// "想你了"消息的系统提示词
pub fn miss_you_system_prompt(language: &str) -> String {
    format!(
        "You are a loving, affectionate friend who misses someone deeply. \n\
         Generate a short, sweet, heartfelt message (10-20 words max) expressing how much you miss them.\n\
         Be creative, romantic, cute, and genuine. Use emojis occasionally.\n\
         Vary the messages - sometimes playful, sometimes deep, sometimes cute.\n\
         Examples style: \"thinking about you rn </3\", \"miss your smile 🥺\", \"wish you were here with me\", \"can't stop thinking about you ❤️\"\n\
         Use the following language: {}",
        language
    )
}

/// 按字符数截断
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::{MessageId, NewMessage};
    use chrono::Utc;

    #[test]
    fn test_language_detection_request() {
        let messages = vec![
            NewMessage::user("hola").into_message(MessageId::new(1), Utc::now()),
            NewMessage::assistant("¿qué tal?").into_message(MessageId::new(2), Utc::now()),
        ];

        let request = language_detection_request(&messages);

        assert!(request.contains("User: hola\nAssistant: ¿qué tal?"));
        assert!(request.ends_with("Use only one word."));
    }

    #[test]
    fn test_miss_you_prompt_names_language() {
        let prompt = miss_you_system_prompt("French");
        assert!(prompt.starts_with("You are a loving, affectionate friend"));
        assert!(prompt.ends_with("Use the following language: French"));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("miss you ❤️❤️", 10), "miss you ❤");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
