//! 性能基准模块：生成大型树并测量核心操作耗时
//!
//! 写时复制的深路径写入应该只复制路径上的节点，这里的测量用于
//! 肉眼确认大树上的各项操作仍在可接受范围内。

use std::rc::Rc;
use std::time::Instant;

use serde::Serialize;

use crate::model::document;
use crate::model::markup;
use crate::model::node::Node;
use crate::model::path::KeyPath;
use crate::model::shadow_tree::build_shadow_tree;
use crate::model::tree_store;

/// 单项测量结果
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成指定深度与宽度的大型测试树
///
/// 每层宽度逐层减半，每三个字段有一个是嵌套作用域，其余为叶子。
pub fn generate_large_tree(depth: usize, width: usize) -> Rc<Node> {
    fn nested(current: usize, max: usize, width: usize) -> Rc<Node> {
        if current >= max {
            return Node::leaf("叶子节点值");
        }
        Node::scope((0..width).map(|i| {
            let key = format!("field_{i}");
            let child = if i % 3 == 2 {
                nested(current + 1, max, (width / 2).max(3))
            } else {
                Node::leaf(format!("字符串值_{i}"))
            };
            (key, child)
        }))
    }

    Node::scope([
        (
            "metadata".to_string(),
            Node::scope([
                ("depth".to_string(), Node::leaf(depth.to_string())),
                ("width".to_string(), Node::leaf(width.to_string())),
                ("description".to_string(), Node::leaf("性能测试用大型树")),
            ]),
        ),
        ("data".to_string(), nested(0, depth, width.max(3))),
    ])
}

/// 依次测量树生成、影子树构建、两种编码与深路径写入
pub fn run_performance_suite(depth: usize, width: usize) -> Vec<PerformanceResult> {
    let mut results = Vec::new();

    let start = Instant::now();
    let tree = generate_large_tree(depth, width);
    results.push(PerformanceResult::new(
        "生成测试树",
        start.elapsed().as_millis(),
        true,
        &format!("深度{depth} 宽度{width}"),
    ));

    let start = Instant::now();
    let rows = build_shadow_tree(&tree);
    results.push(PerformanceResult::new(
        "构建影子树",
        start.elapsed().as_millis(),
        true,
        &format!("{} 行", rows.len()),
    ));

    let start = Instant::now();
    let markup_text = markup::encode(&tree);
    results.push(PerformanceResult::new(
        "标记编码",
        start.elapsed().as_millis(),
        true,
        &format!("{} 字节", markup_text.len()),
    ));

    let start = Instant::now();
    let document_text = document::encode(&tree);
    results.push(match &document_text {
        Ok(text) => PerformanceResult::new(
            "文档编码",
            start.elapsed().as_millis(),
            true,
            &format!("{} 字节", text.len()),
        ),
        Err(e) => PerformanceResult::new(
            "文档编码",
            start.elapsed().as_millis(),
            false,
            &e.to_string(),
        ),
    });

    // 沿嵌套链写入最深处，验证写时复制的开销只与路径长度相关
    let mut segments = vec!["data".to_string()];
    segments.extend((0..depth).map(|_| "field_2".to_string()));
    let start = Instant::now();
    let result = match KeyPath::from_segments(segments) {
        Ok(path) => {
            let _updated = tree_store::set(&tree, &path, Node::leaf("写入"));
            PerformanceResult::new(
                "深路径写入",
                start.elapsed().as_millis(),
                true,
                &format!("路径长度 {}", path.len()),
            )
        }
        Err(e) => PerformanceResult::new(
            "深路径写入",
            start.elapsed().as_millis(),
            false,
            &e.to_string(),
        ),
    };
    results.push(result);

    results
}
