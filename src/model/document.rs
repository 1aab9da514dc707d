//! 文档码流：严格的结构化文档语法（JSON）编解码，委托 serde_json
//!
//! 解码接受任意嵌套的对象；标量一律落为字符串叶子，数组按十进制
//! 下标降级为作用域。编码固定两格缩进、按插入顺序输出，同一棵树
//! 的输出字节级可复现。

use std::rc::Rc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::node::{Node, ScopeMap};

#[derive(Error, Debug)]
pub enum DocumentError {
    /// 语法错误，携带底层解析器报告的位置
    #[error("文档解析失败: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("根节点必须是对象，而不是{0}")]
    RootNotScope(&'static str),
    #[error("文档序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 解码：空白输入得到空根作用域；语法错误与非对象根均拒绝
pub fn decode(text: &str) -> Result<Rc<Node>, DocumentError> {
    if text.trim().is_empty() {
        return Ok(Node::empty_scope());
    }
    let value: Value = serde_json::from_str(text).map_err(|e| DocumentError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    match value {
        Value::Object(map) => Ok(Rc::new(Node::Scope(object_to_scope(map)))),
        other => Err(DocumentError::RootNotScope(kind_name(&other))),
    }
}

/// 编码：serde_json 的 pretty 序列化（两格缩进，插入顺序）
pub fn encode(tree: &Node) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&node_to_value(tree))?)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "数组",
        Value::Object(_) => "对象",
    }
}

fn object_to_scope(map: Map<String, Value>) -> ScopeMap {
    map.into_iter().map(|(key, value)| (key, value_to_node(value))).collect()
}

fn value_to_node(value: Value) -> Rc<Node> {
    match value {
        Value::Object(map) => Rc::new(Node::Scope(object_to_scope(map))),
        Value::Array(items) => Rc::new(Node::Scope(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), value_to_node(item)))
                .collect(),
        )),
        Value::String(text) => Node::leaf(text),
        Value::Number(number) => Node::leaf(number.to_string()),
        Value::Bool(flag) => Node::leaf(flag.to_string()),
        Value::Null => Node::leaf("null"),
    }
}

fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Leaf(value) => Value::String(value.clone()),
        Node::Scope(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), node_to_value(child)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nested_object() {
        let tree = decode(r#"{"app": {"title": "翻译工具"}, "version": "1.0"}"#).unwrap();
        let expected = Node::scope([
            (
                "app".to_string(),
                Node::scope([("title".to_string(), Node::leaf("翻译工具"))]),
            ),
            ("version".to_string(), Node::leaf("1.0")),
        ]);
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_decode_empty_input_is_empty_scope() {
        assert_eq!(decode("").unwrap(), Node::empty_scope(), "空输入应该得到空根作用域");
        assert_eq!(decode("  \n\t").unwrap(), Node::empty_scope());
    }

    #[test]
    fn test_decode_syntax_error_carries_position() {
        let err = decode("{\n  \"a\": }").unwrap_err();
        match err {
            DocumentError::Syntax { line, column, .. } => {
                assert_eq!(line, 2, "错误应该携带底层解析器的行号");
                assert!(column > 0);
            }
            other => panic!("应该是语法错误，实际是 {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_non_object_root() {
        assert!(matches!(decode("42"), Err(DocumentError::RootNotScope("数字"))));
        assert!(matches!(decode("[1, 2]"), Err(DocumentError::RootNotScope("数组"))));
        assert!(matches!(decode("\"文本\""), Err(DocumentError::RootNotScope("字符串"))));
    }

    #[test]
    fn test_decode_coerces_scalars_to_string_leaves() {
        let tree = decode(r#"{"n": 42, "f": 1.5, "b": true, "z": null}"#).unwrap();
        let map = tree.as_scope().unwrap();
        assert_eq!(map.get("n").unwrap().as_leaf(), Some("42"));
        assert_eq!(map.get("f").unwrap().as_leaf(), Some("1.5"));
        assert_eq!(map.get("b").unwrap().as_leaf(), Some("true"));
        assert_eq!(map.get("z").unwrap().as_leaf(), Some("null"));
    }

    #[test]
    fn test_decode_array_becomes_indexed_scope() {
        let tree = decode(r#"{"items": ["甲", "乙"]}"#).unwrap();
        let items = tree.as_scope().unwrap().get("items").unwrap();
        let map = items.as_scope().unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["0", "1"], "数组应该按十进制下标降级为作用域");
        assert_eq!(map.get("0").unwrap().as_leaf(), Some("甲"));
    }

    #[test]
    fn test_encode_exact_bytes() {
        let tree = Node::scope([
            ("a".to_string(), Node::scope([("b".to_string(), Node::leaf("1"))])),
        ]);
        assert_eq!(
            encode(&tree).unwrap(),
            "{\n  \"a\": {\n    \"b\": \"1\"\n  }\n}",
            "编码应该是固定两格缩进的稳定输出"
        );
    }

    #[test]
    fn test_encode_empty_tree() {
        assert_eq!(encode(&Node::empty_scope()).unwrap(), "{}");
    }

    #[test]
    fn test_encode_preserves_insertion_order() {
        let tree = decode(r#"{"b": "2", "a": "1"}"#).unwrap();
        assert_eq!(
            encode(&tree).unwrap(),
            "{\n  \"b\": \"2\",\n  \"a\": \"1\"\n}",
            "键应该按插入顺序输出而不是字母序"
        );
    }

    #[test]
    fn test_roundtrip_exact() {
        let tree = Node::scope([
            (
                "app".to_string(),
                Node::scope([
                    ("title".to_string(), Node::leaf("翻译工具")),
                    ("empty".to_string(), Node::empty_scope()),
                ]),
            ),
            ("version".to_string(), Node::leaf("1.0")),
        ]);
        let text = encode(&tree).unwrap();
        assert_eq!(decode(&text).unwrap(), tree, "文档码流的往返应该精确");
        // 同一棵树的两次编码字节一致
        assert_eq!(encode(&tree).unwrap(), text);
    }
}
