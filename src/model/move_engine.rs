//! 移动引擎：把子树或叶子搬迁到新的父作用域之下
//!
//! 搬迁保留源路径的末段作为新键名，目标处的同名子节点会被覆盖。

use std::rc::Rc;

use crate::model::node::Node;
use crate::model::path::KeyPath;
use crate::model::tree_store::{self, TreeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// 目标位于源之下：搬进自己的子孙会使目标随源一起脱离树
    CyclicMove { source: String, target: String },
    Tree(TreeError),
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::CyclicMove { source, target } => {
                write!(f, "循环移动: 目标 {target} 位于源 {source} 之下")
            }
            MoveError::Tree(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::Tree(e) => Some(e),
            MoveError::CyclicMove { .. } => None,
        }
    }
}

impl From<TreeError> for MoveError {
    fn from(e: TreeError) -> Self {
        MoveError::Tree(e)
    }
}

/// 将 `source` 处的节点移动为 `target` 作用域的子节点
///
/// 合法性检查在任何变更之前完成：
/// 1. 源与目标相同 → 无操作，原样返回；
/// 2. 目标是源的严格后代 → [`MoveError::CyclicMove`]，树不变；
/// 3. 目标就是源的现父级 → 无操作（先写后删会在同一路径上自我抵消，
///    造成节点丢失）；
/// 4. 其余情况按"先写入新位置、再删除旧位置"完成，调用方只会看到
///    最终的树。作用域连同整棵子树一起搬迁（子树按引用共享，无深拷贝）。
pub fn move_node(
    tree: &Rc<Node>,
    source: &KeyPath,
    target: &KeyPath,
) -> Result<Rc<Node>, MoveError> {
    if source == target {
        return Ok(Rc::clone(tree));
    }
    if target.is_descendant_of(source) {
        return Err(MoveError::CyclicMove {
            source: source.format(),
            target: target.format(),
        });
    }
    let new_path = match source.last() {
        Some(last) => target.child(last),
        // 源为根时目标要么与其相等要么是其后代，前两条规则已经拦截
        None => return Ok(Rc::clone(tree)),
    };
    if &new_path == source {
        return Ok(Rc::clone(tree));
    }
    let value = tree_store::get(tree, source)?;
    let inserted = tree_store::set(tree, &new_path, value);
    Ok(tree_store::delete(&inserted, source))
}
