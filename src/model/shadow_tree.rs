//! 影子树（Shadow Tree）：仅存结构与路径的扁平展示索引，不复制子树值

use crate::model::node::{Node, NodeKind};

/// 叶子预览的最大字符数
const PREVIEW_LIMIT: usize = 32;

/// 根行的展示名与路径
pub const ROOT_LABEL: &str = "$";

#[derive(Debug, Clone)]
pub struct TreeRow {
    /// 节点在父级中的键名（根为 "$"）
    pub name: String,
    /// 点号路径（根为 "$"，用于精确寻址与回写）
    pub path: String,
    /// 节点类型
    pub kind: NodeKind,
    /// 子元素数量（作用域字段数），便于展示概要
    pub children: u32,
    /// 轻量预览（字符串截断、作用域概要）
    pub preview: String,
    /// 节点深度（用于缩进显示）
    pub depth: u32,
    /// 是否展开（用于折叠/展开功能）
    pub expanded: bool,
    /// 是否可见（用于搜索过滤与折叠）
    pub visible: bool,
}

/// 从根节点构建全树影子索引
///
/// 同级按键名字母序排列（与原展示一致）；展示顺序不影响树本身的
/// 插入顺序与序列化。
pub fn build_shadow_tree(root: &Node) -> Vec<TreeRow> {
    let mut out = Vec::with_capacity(1024);
    push_row(&mut out, ROOT_LABEL, ROOT_LABEL, root, 0);
    walk(&mut out, root, "", 1);
    out
}

fn push_row(out: &mut Vec<TreeRow>, name: &str, path: &str, node: &Node, depth: u32) {
    out.push(TreeRow {
        name: name.to_string(),
        path: path.to_string(),
        kind: node.kind(),
        children: node.child_count() as u32,
        preview: preview_of(node),
        depth,
        expanded: true, // 终端一次性绘制整棵树，默认全部展开
        visible: true,
    });
}

fn walk(out: &mut Vec<TreeRow>, node: &Node, prefix: &str, depth: u32) {
    let Some(map) = node.as_scope() else { return };
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        let Some(child) = map.get(key) else { continue };
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        push_row(out, key, &path, child, depth);
        walk(out, child, &path, depth + 1);
    }
}

fn preview_of(node: &Node) -> String {
    match node {
        Node::Leaf(value) => {
            let value = value.trim();
            if value.chars().count() > PREVIEW_LIMIT {
                let truncated: String = value.chars().take(PREVIEW_LIMIT).collect();
                format!("\"{truncated}...\"")
            } else {
                format!("\"{value}\"")
            }
        }
        Node::Scope(map) => format!("{{..}} ({} keys)", map.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_scope_shadow_tree() {
        let tree = Node::scope([
            ("name".to_string(), Node::leaf("测试")),
            ("age".to_string(), Node::leaf("30")),
        ]);
        let rows = build_shadow_tree(&tree);

        // 应该有3行：根、age、name（同级按字母序）
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "$");
        assert_eq!(rows[0].path, "$");
        assert_eq!(rows[0].kind, NodeKind::Scope);
        assert_eq!(rows[0].children, 2);
        assert_eq!(rows[1].name, "age", "同级应该按键名字母序排列");
        assert_eq!(rows[2].name, "name");
    }

    #[test]
    fn test_nested_paths() {
        let tree = Node::scope([(
            "user".to_string(),
            Node::scope([(
                "profile".to_string(),
                Node::scope([("name".to_string(), Node::leaf("张三"))]),
            )]),
        )]);
        let rows = build_shadow_tree(&tree);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].path, "$");
        assert_eq!(rows[1].path, "user");
        assert_eq!(rows[2].path, "user.profile");
        assert_eq!(rows[3].path, "user.profile.name");
        assert_eq!(rows[3].depth, 3);
    }

    #[test]
    fn test_preview_generation() {
        let long_value = "这是一个非常长的字符串，应该被截断以便在预览中显示，不应该显示完整内容";
        let tree = Node::scope([
            ("short".to_string(), Node::leaf("短文本")),
            ("long".to_string(), Node::leaf(long_value)),
            ("scope".to_string(), Node::scope([("x".to_string(), Node::leaf("1"))])),
        ]);
        let rows = build_shadow_tree(&tree);
        for row in &rows {
            match row.name.as_str() {
                "short" => assert_eq!(row.preview, "\"短文本\""),
                "long" => assert!(row.preview.contains("..."), "超长值应该被截断"),
                "scope" => assert_eq!(row.preview, "{..} (1 keys)"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_rows_default_expanded_and_visible() {
        let tree = Node::scope([("a".to_string(), Node::leaf("1"))]);
        let rows = build_shadow_tree(&tree);
        assert!(rows.iter().all(|r| r.expanded && r.visible));
    }

    #[test]
    fn test_empty_tree_has_only_root_row() {
        let rows = build_shadow_tree(&Node::empty_scope());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].children, 0);
        assert_eq!(rows[0].preview, "{..} (0 keys)");
    }
}
