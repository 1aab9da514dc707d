//! VM桥接层：连接终端 shell 与 AppState 数据模型
//!
//! 提供状态常量、命令解析与树行渲染；命令循环本身在 main.rs 中。

use crate::model::node::NodeKind;
use crate::model::shadow_tree::TreeRow;

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_LOADING: &str = "正在加载文件...";
pub const STATUS_LOADED: &str = "文件加载完成";
pub const STATUS_MOVED: &str = "移动完成";
pub const STATUS_EXPORTED: &str = "导出完成";
pub const STATUS_UNDONE: &str = "已撤销";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

pub const HELP_TEXT: &str = "\
命令一览:
  open <文件>           加载 .json/.yml/.yaml 翻译文件
  tree                  显示当前树
  set <路径> <值>       写入叶子值（点号路径，缺失的作用域自动创建）
  del <路径>            删除节点
  move <源> <目标>      把源节点移入目标作用域（目标用 $ 表示根）
  copy <路径>           以文档格式打印子树（$ 表示整棵树）
  dup                   列出值重复的叶子
  search <文本>         按路径/键名过滤显示（空参数恢复）
  toggle <路径>         折叠/展开作用域
  export [格式] [文件]  导出 json|yaml，缺省打印到终端
  undo                  撤销上一次变更
  bench                 运行性能测量
  help                  显示本帮助
  quit                  退出";

/// shell 支持的交互命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Tree,
    Set { path: String, value: String },
    Delete(String),
    Move { source: String, target: String },
    Copy(String),
    Duplicates,
    Search(String),
    Toggle(String),
    Export { format: Option<String>, file: Option<String> },
    Undo,
    Bench,
    Help,
    Quit,
}

/// 解析一行输入；空行返回 `None`，用法错误返回 `Err` 提示文本
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();
    let command = match head {
        "open" => Command::Open(required(&rest, 0, "open <文件路径>")?),
        "tree" | "ls" => Command::Tree,
        "set" => {
            if rest.len() < 2 {
                return Err("用法: set <路径> <值>".to_string());
            }
            Command::Set {
                path: rest[0].to_string(),
                value: rest[1..].join(" "),
            }
        }
        "del" | "delete" => Command::Delete(required(&rest, 0, "del <路径>")?),
        "move" | "mv" => Command::Move {
            source: required(&rest, 0, "move <源路径> <目标作用域>")?,
            target: required(&rest, 1, "move <源路径> <目标作用域>")?,
        },
        "copy" => Command::Copy(required(&rest, 0, "copy <路径>")?),
        "dup" | "duplicates" => Command::Duplicates,
        "search" => Command::Search(rest.join(" ")),
        "toggle" => Command::Toggle(required(&rest, 0, "toggle <路径>")?),
        "export" => Command::Export {
            format: rest.first().map(|s| s.to_string()),
            file: rest.get(1).map(|s| s.to_string()),
        },
        "undo" => Command::Undo,
        "bench" => Command::Bench,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("未知命令: {other}（输入 help 查看用法）")),
    };
    Ok(Some(command))
}

fn required(rest: &[&str], index: usize, usage: &str) -> Result<String, String> {
    rest.get(index)
        .map(|s| s.to_string())
        .ok_or_else(|| format!("用法: {usage}"))
}

/// 渲染一行影子树：深度缩进 + 键名 + 预览，折叠的作用域带 [+] 标记
pub fn format_row(row: &TreeRow) -> String {
    let indent = "  ".repeat(row.depth as usize);
    let marker = if row.kind == NodeKind::Scope && !row.expanded {
        " [+]"
    } else {
        ""
    };
    format!("{indent}{}: {}{marker}", row.name, row.preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Node;
    use crate::model::shadow_tree::build_shadow_tree;

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \n"), Ok(None));
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("tree"), Ok(Some(Command::Tree)));
        assert_eq!(parse_command("undo\n"), Ok(Some(Command::Undo)));
        assert_eq!(
            parse_command("open 翻译.yml"),
            Ok(Some(Command::Open("翻译.yml".to_string())))
        );
        assert_eq!(
            parse_command("move a.b $"),
            Ok(Some(Command::Move { source: "a.b".to_string(), target: "$".to_string() }))
        );
    }

    #[test]
    fn test_parse_set_joins_value_words() {
        assert_eq!(
            parse_command("set app.title 你好 世界"),
            Ok(Some(Command::Set {
                path: "app.title".to_string(),
                value: "你好 世界".to_string(),
            }))
        );
    }

    #[test]
    fn test_parse_missing_arguments_is_usage_error() {
        assert!(parse_command("set app.title").is_err());
        assert!(parse_command("move a.b").is_err());
        assert!(parse_command("open").is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_command("没有这个命令").unwrap_err();
        assert!(err.contains("未知命令"));
    }

    #[test]
    fn test_parse_export_variants() {
        assert_eq!(
            parse_command("export"),
            Ok(Some(Command::Export { format: None, file: None }))
        );
        assert_eq!(
            parse_command("export json out.json"),
            Ok(Some(Command::Export {
                format: Some("json".to_string()),
                file: Some("out.json".to_string()),
            }))
        );
    }

    #[test]
    fn test_format_row_indentation_and_marker() {
        let tree = Node::scope([(
            "app".to_string(),
            Node::scope([("title".to_string(), Node::leaf("你好"))]),
        )]);
        let mut rows = build_shadow_tree(&tree);
        assert_eq!(format_row(&rows[2]), "    title: \"你好\"");
        rows[1].expanded = false;
        assert!(format_row(&rows[1]).ends_with("[+]"), "折叠的作用域应该有标记");
    }
}
