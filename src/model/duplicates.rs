//! 重复值检测：扫描值相同的叶子，仅作提示用途，不拦截任何操作

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::node::Node;
use crate::model::path::KeyPath;

/// 一组值相同的叶子及其全部路径
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub value: String,
    pub paths: Vec<KeyPath>,
}

/// 深度优先收集所有叶子，按值精确分组，返回成员数≥2的组（首见顺序）
pub fn find_duplicates(tree: &Node) -> Vec<DuplicateGroup> {
    let mut by_value: IndexMap<String, Vec<KeyPath>> = IndexMap::new();
    collect(tree, &KeyPath::root(), &mut by_value);
    by_value
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(value, paths)| DuplicateGroup { value, paths })
        .collect()
}

fn collect(node: &Node, path: &KeyPath, by_value: &mut IndexMap<String, Vec<KeyPath>>) {
    match node {
        Node::Leaf(value) => by_value.entry(value.clone()).or_default().push(path.clone()),
        Node::Scope(map) => {
            for (key, child) in map {
                collect(child, &path.child(key.as_str()), by_value);
            }
        }
    }
}
