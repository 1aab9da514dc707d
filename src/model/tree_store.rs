//! 树存储：按路径读写删的纯函数
//!
//! 每次变更都返回新的树值，只复制变更路径上的节点，
//! 未触及的子树按引用共享；调用方通过引用同一性判断是否发生变化。

use std::rc::Rc;

use thiserror::Error;

use crate::model::node::{Node, ScopeMap};
use crate::model::path::KeyPath;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("路径不存在: {0}")]
    NotFound(String),
}

/// 按路径取节点；中间段缺失或落在叶子上均视为不存在。
/// 根路径返回树本身。
pub fn get(tree: &Rc<Node>, path: &KeyPath) -> Result<Rc<Node>, TreeError> {
    let mut current = tree;
    for segment in path.segments() {
        current = current
            .as_scope()
            .and_then(|map| map.get(segment))
            .ok_or_else(|| TreeError::NotFound(path.format()))?;
    }
    Ok(Rc::clone(current))
}

/// 按路径写入节点，返回新树
///
/// 缺失的中间作用域会被创建；挡路的中间叶子按覆盖语义替换为新作用域。
/// 根路径写入即整树替换。
pub fn set(tree: &Rc<Node>, path: &KeyPath, value: Rc<Node>) -> Rc<Node> {
    set_at(tree, path.segments(), value)
}

fn set_at(node: &Rc<Node>, segments: &[String], value: Rc<Node>) -> Rc<Node> {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };
    // 只复制本层映射，兄弟子树以引用共享
    let mut map = match node.as_scope() {
        Some(map) => map.clone(),
        None => ScopeMap::new(),
    };
    let child = match map.get(head) {
        Some(child) => set_at(child, rest, value),
        None => set_at(&Node::empty_scope(), rest, value),
    };
    map.insert(head.clone(), child);
    Rc::new(Node::Scope(map))
}

/// 按路径删除节点，返回新树
///
/// 路径不存在（或为根）时是无操作，原样返回同一引用，因此幂等，
/// 且引用比较会报告"无变化"。
pub fn delete(tree: &Rc<Node>, path: &KeyPath) -> Rc<Node> {
    match delete_at(tree, path.segments()) {
        Some(new_tree) => new_tree,
        None => Rc::clone(tree),
    }
}

fn delete_at(node: &Rc<Node>, segments: &[String]) -> Option<Rc<Node>> {
    // 根不可从父级移除
    let (head, rest) = segments.split_first()?;
    let map = node.as_scope()?;
    if rest.is_empty() {
        if !map.contains_key(head) {
            return None;
        }
        let mut map = map.clone();
        // shift_remove 保持兄弟顺序
        map.shift_remove(head);
        return Some(Rc::new(Node::Scope(map)));
    }
    let new_child = delete_at(map.get(head)?, rest)?;
    let mut map = map.clone();
    map.insert(head.clone(), new_child);
    Some(Rc::new(Node::Scope(map)))
}
