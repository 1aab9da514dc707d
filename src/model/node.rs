//! 树节点：作用域（Scope）与叶子（Leaf）组成的递归和类型

use std::rc::Rc;

use indexmap::IndexMap;

/// 作用域内部的有序映射：键唯一，插入顺序保留用于展示与序列化
pub type ScopeMap = IndexMap<String, Rc<Node>>;

/// 树节点：要么是子节点映射（作用域），要么是单个字符串值（叶子）
///
/// 相等比较忽略作用域内的键顺序（顺序只是展示与序列化细节）
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scope(ScopeMap),
    Leaf(String),
}

/// 节点类型（与展示层解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scope,
    Leaf,
}

impl Node {
    /// 空作用域（导入空文本时的根节点）
    pub fn empty_scope() -> Rc<Node> {
        Rc::new(Node::Scope(ScopeMap::new()))
    }

    pub fn leaf(value: impl Into<String>) -> Rc<Node> {
        Rc::new(Node::Leaf(value.into()))
    }

    /// 由键值对构建作用域（保持传入顺序）
    pub fn scope<I>(entries: I) -> Rc<Node>
    where
        I: IntoIterator<Item = (String, Rc<Node>)>,
    {
        Rc::new(Node::Scope(entries.into_iter().collect()))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scope(_) => NodeKind::Scope,
            Node::Leaf(_) => NodeKind::Leaf,
        }
    }

    pub fn is_scope(&self) -> bool {
        matches!(self, Node::Scope(_))
    }

    pub fn as_scope(&self) -> Option<&ScopeMap> {
        match self {
            Node::Scope(map) => Some(map),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Scope(_) => None,
        }
    }

    /// 子元素数量（作用域字段数，叶子为0）
    pub fn child_count(&self) -> usize {
        match self {
            Node::Scope(map) => map.len(),
            Node::Leaf(_) => 0,
        }
    }
}
