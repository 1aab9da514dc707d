//! 标记码流：受限的行式缩进标记的编解码
//!
//! 语法只有 `键: 值` 行、`键:` 开启作用域与 `#` 注释，刻意不是完整的
//! YAML：不支持列表、多行字符串与转义引号，越界的输入按原样尽力处理，
//! 不做校验。解码是显式的缩进栈状态机。

use std::rc::Rc;

use crate::model::node::{Node, ScopeMap};

/// 根帧使用的虚拟缩进，任何真实行都不会弹出它
const ROOT_INDENT: isize = -2;

/// 编码时每层子节点相对父级的缩进
const INDENT_STEP: usize = 2;

/// 尚未闭合的作用域及其记录缩进；`key` 是它在父级中的键名
struct Frame {
    key: String,
    map: ScopeMap,
    indent: isize,
}

/// 把栈顶帧闭合为作用域节点，挂回新的栈顶（根帧永不闭合）
fn fold_top(stack: &mut Vec<Frame>) {
    if stack.len() < 2 {
        return;
    }
    let Some(frame) = stack.pop() else { return };
    if let Some(top) = stack.last_mut() {
        top.map.insert(frame.key, Rc::new(Node::Scope(frame.map)));
    }
}

/// 去掉一对包裹的双引号；内部引号不做转义处理
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// 解码：逐行处理，缩进决定嵌套深度
///
/// 受限文法对任何输入都有一种接法，因此解码不会失败；
/// 空输入得到空的根作用域。
pub fn decode(text: &str) -> Rc<Node> {
    let mut stack: Vec<Frame> = vec![Frame {
        key: String::new(),
        map: ScopeMap::new(),
        indent: ROOT_INDENT,
    }];

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.chars().take_while(|c| c.is_whitespace()).count() as isize;
        let (key, value) = match trimmed.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            // 无冒号的行按开启作用域处理
            None => (trimmed, ""),
        };

        // 缩进不再增加时退回到所属的祖先作用域
        while stack.len() > 1 && stack.last().is_some_and(|top| indent <= top.indent) {
            fold_top(&mut stack);
        }

        if value.is_empty() {
            stack.push(Frame {
                key: key.to_string(),
                map: ScopeMap::new(),
                indent,
            });
        } else if let Some(top) = stack.last_mut() {
            top.map.insert(key.to_string(), Node::leaf(strip_quotes(value)));
        }
    }

    while stack.len() > 1 {
        fold_top(&mut stack);
    }
    let root = stack.pop().map(|frame| frame.map).unwrap_or_default();
    Rc::new(Node::Scope(root))
}

/// 编码：作用域输出 `键:` 并把子级缩进两格，叶子恒定加引号输出
///
/// 解码再编码只保证逻辑结构一致，不保证空白与引号逐字复原。
pub fn encode(tree: &Node) -> String {
    let mut out = String::new();
    encode_children(tree, 0, &mut out);
    out
}

fn encode_children(node: &Node, indent: usize, out: &mut String) {
    let Some(map) = node.as_scope() else { return };
    let pad = " ".repeat(indent);
    for (key, child) in map {
        match child.as_ref() {
            Node::Scope(_) => {
                out.push_str(&format!("{pad}{key}:\n"));
                encode_children(child, indent + INDENT_STEP, out);
            }
            Node::Leaf(value) => {
                out.push_str(&format!("{pad}{key}: \"{value}\"\n"));
            }
        }
    }
}
