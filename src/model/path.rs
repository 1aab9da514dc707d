//! 键路径（KeyPath）：分段序列与点号文本的互转
//!
//! 点号文本只是展示与输入的便捷形式：包含分隔符的段无法用文本表达，
//! 只能通过 [`KeyPath::from_segments`] 构造；`parse(format(p)) == p`
//! 仅对不含分隔符的段成立，此处不引入转义方案。

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// 路径文本形式中的结构分隔符
pub const SEPARATOR: char = '.';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("无效路径: 路径不能为空")]
    Empty,
    #[error("无效路径: 含空白分段 ({0})")]
    EmptySegment(String),
}

/// 从根出发定位节点的键序列
///
/// [`KeyPath::root`]（空序列）指向根作用域本身，只能通过API构造，
/// `parse` 永远不会产生它。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// 根作用域路径（空分段序列）
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// 解析点号文本；空输入与空分段均视为无效路径
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if text.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = text.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(text.to_string()));
        }
        Ok(Self { segments })
    }

    /// 由既有分段构造（可表达含分隔符的键；空序列得到根路径）
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(segments.join(".")));
        }
        Ok(Self { segments })
    }

    /// 点号文本形式（根路径为空字符串，展示层用 "$" 表示）
    pub fn format(&self) -> String {
        self.segments.join(".")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// 末段键名（根路径没有末段）
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// 父路径（根路径没有父级）
    pub fn parent(&self) -> Option<KeyPath> {
        match self.segments.split_last() {
            Some((_, rest)) => Some(Self { segments: rest.to_vec() }),
            None => None,
        }
    }

    /// 追加一段得到子路径
    pub fn child(&self, segment: impl Into<String>) -> KeyPath {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// 严格后代判定：self 是否位于 ancestor 之下（不含相等）
    pub fn is_descendant_of(&self, ancestor: &KeyPath) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments[..ancestor.segments.len()] == ancestor.segments[..]
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_roundtrip() {
        let path = KeyPath::parse("app.login.title").unwrap();
        assert_eq!(path.segments(), &["app", "login", "title"]);
        assert_eq!(path.format(), "app.login.title");
        assert_eq!(
            KeyPath::parse(&path.format()).unwrap(),
            path,
            "不含分隔符的段上 parse 应该是 format 的左逆"
        );
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert_eq!(KeyPath::parse(""), Err(PathError::Empty), "空输入应该是无效路径");
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(matches!(KeyPath::parse("a..b"), Err(PathError::EmptySegment(_))));
        assert!(matches!(KeyPath::parse(".a"), Err(PathError::EmptySegment(_))));
        assert!(matches!(KeyPath::parse("a."), Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn test_root_path() {
        let root = KeyPath::root();
        assert!(root.is_root());
        assert_eq!(root.format(), "");
        assert_eq!(root.last(), None);
        assert_eq!(root.parent(), None);
        // parse 永远不会产生根路径
        assert!(KeyPath::parse("").is_err());
    }

    #[test]
    fn test_parent_child_last() {
        let path = KeyPath::parse("a.b.c").unwrap();
        assert_eq!(path.last(), Some("c"));
        assert_eq!(path.parent().unwrap(), KeyPath::parse("a.b").unwrap());
        assert_eq!(KeyPath::root().child("a").child("b"), KeyPath::parse("a.b").unwrap());
    }

    #[test]
    fn test_descendant_check() {
        let source = KeyPath::parse("a.b").unwrap();
        assert!(KeyPath::parse("a.b.c").unwrap().is_descendant_of(&source));
        assert!(KeyPath::parse("a.b.c.d").unwrap().is_descendant_of(&source));
        assert!(!source.is_descendant_of(&source), "相等不算后代");
        assert!(!KeyPath::parse("a.bc").unwrap().is_descendant_of(&source), "前缀必须按分段对齐");
        assert!(!KeyPath::parse("a").unwrap().is_descendant_of(&source));
        // 任何非根路径都是根的后代
        assert!(source.is_descendant_of(&KeyPath::root()));
    }

    #[test]
    fn test_from_segments_allows_separator_in_key() {
        let path = KeyPath::from_segments(["a.b", "c"]).unwrap();
        assert_eq!(path.len(), 2);
        // 已知限制：这种路径的文本形式是歧义的
        assert_eq!(path.format(), "a.b.c");
        assert_ne!(KeyPath::parse("a.b.c").unwrap(), path);
    }
}
