//! 程序入口：初始化日志、解析参数并运行交互式命令循环
//!
//! shell 持有唯一的"当前树"，逐条执行用户命令（一次一个操作），
//! 每次成功的变更后整体替换当前状态。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use fanyi_shu::model::data_core::{AppState, DataFormat};
use fanyi_shu::model::performance::run_performance_suite;
use fanyi_shu::vm::bridge::{self, Command};

/// 层级翻译数据的交互式树编辑器
#[derive(Parser, Debug)]
#[command(name = "fanyi_shu", about = "层级翻译数据的交互式树编辑器")]
struct Args {
    /// 启动时加载的翻译文件（.json/.yml/.yaml）
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    // 日志初始化（RUST_LOG 控制级别）
    SubscriberBuilder::default().init();

    let args = Args::parse();
    let mut state = AppState::default();

    if let Some(file) = &args.file {
        match state.load_file(file) {
            Ok(()) => report_after_import(&state),
            Err(e) => println!("{}{e}", bridge::STATUS_ERROR_PREFIX),
        }
    }

    println!("{}（输入 help 查看命令）", bridge::STATUS_READY);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        match bridge::parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = dispatch(&mut state, command) {
                    println!("{}{e}", bridge::STATUS_ERROR_PREFIX);
                }
            }
            Err(usage) => println!("{usage}"),
        }
    }
    Ok(())
}

/// 执行一条命令；错误统一回到循环里提示，不中断会话
fn dispatch(state: &mut AppState, command: Command) -> Result<()> {
    match command {
        Command::Open(path) => {
            println!("{}", bridge::STATUS_LOADING);
            state.load_file(&PathBuf::from(path))?;
            println!("{}", bridge::STATUS_LOADED);
            report_after_import(state);
        }
        Command::Tree => print_tree(state),
        Command::Set { path, value } => {
            state.set_value(&path, &value)?;
            print_tree(state);
        }
        Command::Delete(path) => {
            state.delete_path(&path)?;
            print_tree(state);
        }
        Command::Move { source, target } => {
            state.move_path(&source, &target)?;
            println!("{}: {source} -> {target}", bridge::STATUS_MOVED);
            print_tree(state);
        }
        Command::Copy(path) => println!("{}", state.copy_subtree_pretty(&path)?),
        Command::Duplicates => {
            let groups = state.duplicate_groups();
            if groups.is_empty() {
                println!("未发现重复翻译");
            } else {
                println!("发现 {} 组重复翻译:", groups.len());
                println!("{}", serde_json::to_string_pretty(&groups)?);
            }
        }
        Command::Search(filter) => {
            state.apply_search_filter(&filter);
            print_tree(state);
        }
        Command::Toggle(path) => {
            state.toggle_node_expanded(&path);
            print_tree(state);
        }
        Command::Export { format, file } => {
            let format = match format {
                Some(name) => Some(DataFormat::from_name(&name)?),
                None => None,
            };
            match file {
                Some(file) => {
                    let payload = state.export_to_file(&PathBuf::from(file), format)?;
                    println!(
                        "{} -> {} ({})",
                        bridge::STATUS_EXPORTED,
                        payload.filename,
                        payload.media_type
                    );
                }
                None => {
                    let payload = state.export_payload(format)?;
                    print!("{}", payload.text);
                    if !payload.text.ends_with('\n') {
                        println!();
                    }
                }
            }
        }
        Command::Undo => {
            state.undo()?;
            println!("{}", bridge::STATUS_UNDONE);
            print_tree(state);
        }
        Command::Bench => {
            let results = run_performance_suite(6, 8);
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Help => println!("{}", bridge::HELP_TEXT),
        Command::Quit => {}
    }
    Ok(())
}

/// 导入成功后给出重复值提示（仅提示，不拦截任何操作）
fn report_after_import(state: &AppState) {
    let groups = state.duplicate_groups();
    if !groups.is_empty() {
        println!("警告: 发现 {} 组重复翻译（输入 dup 查看详情）", groups.len());
    }
    print_tree(state);
}

/// 打印可见的影子树行
fn print_tree(state: &AppState) {
    if state.tree_flat.len() <= 1 {
        println!("（空树：open 导入翻译文件，或直接 set 添加条目）");
        return;
    }
    for row in &state.tree_flat {
        if row.visible {
            println!("{}", bridge::format_row(row));
        }
    }
}
