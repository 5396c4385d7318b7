//! Chapter Context - Content Model
//!
//! 章节内容是一个带标签的联合体:
//! - simple:      `{ "text": "..." }`
//! - interactive: `{ "nodes": [ {...}, ... ] }`
//!
//! 除必需字段外的其它键原样保留（如互动章节的 `start_node`）。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ChapterError;

/// 互动节点中参与字数统计的字段
pub const WORD_BEARING_NODE_KEYS: [&str; 3] = ["text", "content", "dialogue"];

/// 章节内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// 普通文本
    #[default]
    Simple,
    /// 互动节点图
    Interactive,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Simple => "simple",
            ContentType::Interactive => "interactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(ContentType::Simple),
            "interactive" => Some(ContentType::Interactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 普通文本内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleContent {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 互动内容
///
/// 节点是自由格式的 JSON；不校验节点 ID 唯一性，也不校验 `next` 指向。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractiveContent {
    pub nodes: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 已校验的章节内容
#[derive(Debug, Clone, PartialEq)]
pub enum ChapterContent {
    Simple(SimpleContent),
    Interactive(InteractiveContent),
}

impl ChapterContent {
    /// 按声明的类型校验 `content_data`
    pub fn parse(content_type: ContentType, data: &Value) -> Result<Self, ChapterError> {
        let map = match data {
            Value::Object(map) if map.is_empty() => {
                return Err(ChapterError::InvalidContent(
                    "content_data cannot be empty".to_string(),
                ))
            }
            Value::Object(map) => map,
            _ => {
                return Err(ChapterError::InvalidContent(
                    "content_data must be a JSON object".to_string(),
                ))
            }
        };

        let mut extra = map.clone();
        match content_type {
            ContentType::Simple => match extra.remove("text") {
                Some(Value::String(text)) => Ok(Self::Simple(SimpleContent { text, extra })),
                Some(_) => Err(ChapterError::InvalidContent(
                    "'text' field must be a string".to_string(),
                )),
                None => Err(ChapterError::InvalidContent(
                    "Simple chapters must have 'text' field in content_data".to_string(),
                )),
            },
            ContentType::Interactive => match extra.remove("nodes") {
                Some(Value::Array(nodes)) => {
                    Ok(Self::Interactive(InteractiveContent { nodes, extra }))
                }
                Some(_) => Err(ChapterError::InvalidContent(
                    "'nodes' field must be a list".to_string(),
                )),
                None => Err(ChapterError::InvalidContent(
                    "Interactive chapters must have 'nodes' field in content_data".to_string(),
                )),
            },
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ChapterContent::Simple(_) => ContentType::Simple,
            ChapterContent::Interactive(_) => ContentType::Interactive,
        }
    }

    /// 还原为持久化 / 响应用的 JSON 对象
    pub fn to_value(&self) -> Value {
        let (key, value, extra) = match self {
            ChapterContent::Simple(c) => ("text", Value::String(c.text.clone()), &c.extra),
            ChapterContent::Interactive(c) => ("nodes", Value::Array(c.nodes.clone()), &c.extra),
        };
        let mut map = extra.clone();
        map.insert(key.to_string(), value);
        Value::Object(map)
    }

    /// 字数统计
    ///
    /// - simple: 按空白切分 `text`
    /// - interactive: 累加每个对象节点上 `text` / `content` / `dialogue` 的词数，
    ///   非对象节点计 0；非字符串字段先经 [`field_text`] 渲染再切分
    pub fn word_count(&self) -> usize {
        match self {
            ChapterContent::Simple(c) => count_words(&c.text),
            ChapterContent::Interactive(c) => c
                .nodes
                .iter()
                .filter_map(Value::as_object)
                .map(|node| {
                    WORD_BEARING_NODE_KEYS
                        .iter()
                        .filter_map(|key| node.get(*key))
                        .map(|value| match value {
                            Value::String(s) => count_words(s),
                            other => count_words(&field_text(other)),
                        })
                        .sum::<usize>()
                })
                .sum(),
        }
    }
}

/// 按空白串切分计数，空串为 0
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 节点字段的文本形式
///
/// 字符串原样返回；其它值按 `None` / `True` / `['a', 'b']` / `{'k': 'v'}`
/// 的形式渲染，列表与对象的分隔符后带空格，嵌套字符串带引号且内部换行等被转义。
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_repr(other, &mut out);
            out
        }
    }
}

fn write_repr(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_quoted(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(key, out);
                out.push_str(": ");
                write_repr(item, out);
            }
            out.push('}');
        }
    }
}

/// 引号内只保留普通空格，其余空白与控制字符转义为单个词内的字符
fn write_quoted(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            ' ' => out.push(' '),
            c if c.is_whitespace() || c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');
}
