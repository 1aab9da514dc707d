//! AppState：应用核心状态与导入/导出/编辑边界
//!
//! 核心操作全部是纯函数，这里负责把它们串成 shell 可用的状态机：
//! 持有唯一的"当前树"引用，每次成功操作后整体替换（后写胜出），
//! 并保留历史版本用于撤销。

use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::model::document::{self, DocumentError};
use crate::model::duplicates::{find_duplicates, DuplicateGroup};
use crate::model::markup;
use crate::model::move_engine::{move_node, MoveError};
use crate::model::node::Node;
use crate::model::path::{KeyPath, PathError};
use crate::model::shadow_tree::{build_shadow_tree, TreeRow, ROOT_LABEL};
use crate::model::tree_store::{self, TreeError};
use crate::utils::fs::{read_text_file, write_text_file};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Path(#[from] PathError),
    #[error("{0}")]
    Tree(#[from] TreeError),
    #[error("{0}")]
    Move(#[from] MoveError),
    #[error("{0}")]
    Document(#[from] DocumentError),
    #[error("不支持的文件格式: {0}")]
    UnsupportedFormat(String),
    #[error("状态错误: {0}")]
    State(String),
}

/// 两种互换的树序列化格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// 缩进行式标记（.yml/.yaml）
    Markup,
    /// 结构化文档（.json）
    Document,
}

impl DataFormat {
    /// 按文件扩展名推断格式；其他扩展名一律拒绝
    pub fn from_extension(path: &Path) -> Result<Self, AppError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(DataFormat::Document),
            Some("yml") | Some("yaml") => Ok(DataFormat::Markup),
            _ => Err(AppError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// 按名字解析（shell 的 export 参数）
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        match name {
            "json" | "document" => Ok(DataFormat::Document),
            "yaml" | "yml" | "markup" => Ok(DataFormat::Markup),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 导出时建议的文件名
    pub fn suggested_filename(self) -> &'static str {
        match self {
            DataFormat::Document => "translations.json",
            DataFormat::Markup => "translations.yml",
        }
    }

    /// 导出时的媒体类型
    pub fn media_type(self) -> &'static str {
        match self {
            DataFormat::Document => "application/json",
            DataFormat::Markup => "text/yaml",
        }
    }
}

/// 导出产物：文本、建议文件名与媒体类型
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub text: String,
    pub filename: &'static str,
    pub media_type: &'static str,
}

/// 导入边界：按格式把原始文本解析为树（空文本得到空根作用域）
pub fn import(text: &str, format: DataFormat) -> Result<Rc<Node>, AppError> {
    match format {
        DataFormat::Markup => Ok(markup::decode(text)),
        DataFormat::Document => Ok(document::decode(text)?),
    }
}

/// 导出边界：把树序列化为所选格式的文本
pub fn export(tree: &Node, format: DataFormat) -> Result<ExportPayload, AppError> {
    let text = match format {
        DataFormat::Markup => markup::encode(tree),
        DataFormat::Document => document::encode(tree)?,
    };
    Ok(ExportPayload {
        text,
        filename: format.suggested_filename(),
        media_type: format.media_type(),
    })
}

/// 应用核心状态：当前树、历史版本与展示用影子树
#[derive(Debug)]
pub struct AppState {
    pub source_path: Option<PathBuf>,
    pub format: DataFormat,
    tree: Rc<Node>,
    history: Vec<Rc<Node>>,
    pub tree_flat: Vec<TreeRow>,
}

impl Default for AppState {
    fn default() -> Self {
        let tree = Node::empty_scope();
        let tree_flat = build_shadow_tree(&tree);
        Self {
            source_path: None,
            format: DataFormat::Markup,
            tree,
            history: Vec::new(),
            tree_flat,
        }
    }
}

impl AppState {
    /// 当前树（唯一持有者，外部只读）
    pub fn tree(&self) -> &Rc<Node> {
        &self.tree
    }

    /// 可撤销的历史版本数
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// 整树替换：按引用同一性判断变化，推入历史并重建影子树
    fn replace_tree(&mut self, new_tree: Rc<Node>) {
        if Rc::ptr_eq(&self.tree, &new_tree) {
            return;
        }
        self.history.push(Rc::clone(&self.tree));
        self.tree_flat = build_shadow_tree(&new_tree);
        self.tree = new_tree;
    }

    /// 加载文件：按扩展名推断格式并解析，整体替换当前状态
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let format = DataFormat::from_extension(p)?;
        let text = read_text_file(p)?;
        self.import_text(&text, format)?;
        self.source_path = Some(p.to_path_buf());
        tracing::info!("已加载 {} ({:?})", p.display(), format);
        Ok(())
    }

    /// 从文本导入：新导入整体替换当前树并丢弃全部历史
    pub fn import_text(&mut self, text: &str, format: DataFormat) -> Result<(), AppError> {
        let tree = import(text, format)?;
        self.format = format;
        self.history.clear();
        self.tree_flat = build_shadow_tree(&tree);
        self.tree = tree;
        Ok(())
    }

    /// 以指定格式导出（缺省用当前格式）
    pub fn export_payload(&self, format: Option<DataFormat>) -> Result<ExportPayload, AppError> {
        export(&self.tree, format.unwrap_or(self.format))
    }

    /// 导出并写入文件
    pub fn export_to_file(
        &self,
        path: &Path,
        format: Option<DataFormat>,
    ) -> Result<ExportPayload, AppError> {
        let payload = self.export_payload(format)?;
        write_text_file(path, &payload.text)?;
        tracing::info!("已导出到 {} ({})", path.display(), payload.media_type);
        Ok(payload)
    }

    /// 读取路径处的节点
    pub fn get_node(&self, path_text: &str) -> Result<Rc<Node>, AppError> {
        let path = Self::parse_scope_path(path_text)?;
        Ok(tree_store::get(&self.tree, &path)?)
    }

    /// 在路径处写入叶子值（缺失的中间作用域会被创建）
    pub fn set_value(&mut self, path_text: &str, value: &str) -> Result<(), AppError> {
        let path = KeyPath::parse(path_text)?;
        let new_tree = tree_store::set(&self.tree, &path, Node::leaf(value));
        tracing::debug!("写入 {path} = {value:?}");
        self.replace_tree(new_tree);
        Ok(())
    }

    /// 删除路径处的节点（路径不存在时是无操作）
    pub fn delete_path(&mut self, path_text: &str) -> Result<(), AppError> {
        let path = KeyPath::parse(path_text)?;
        let new_tree = tree_store::delete(&self.tree, &path);
        tracing::debug!("删除 {path}");
        self.replace_tree(new_tree);
        Ok(())
    }

    /// 把 source 移到 target 作用域下（target 用 "$" 表示根）
    pub fn move_path(&mut self, source_text: &str, target_text: &str) -> Result<(), AppError> {
        let source = KeyPath::parse(source_text)?;
        let target = Self::parse_scope_path(target_text)?;
        let new_tree = move_node(&self.tree, &source, &target)?;
        tracing::info!("移动 {source} -> {}", target_text);
        self.replace_tree(new_tree);
        Ok(())
    }

    /// 按路径提取子树的文档格式 pretty 文本（供复制/展示）
    pub fn copy_subtree_pretty(&self, path_text: &str) -> Result<String, AppError> {
        let node = self.get_node(path_text)?;
        Ok(document::encode(&node)?)
    }

    /// 重复值提示（仅展示）
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup> {
        find_duplicates(&self.tree)
    }

    /// 撤销：回退到上一版本树
    pub fn undo(&mut self) -> Result<(), AppError> {
        let prev = self
            .history
            .pop()
            .ok_or_else(|| AppError::State("没有可撤销的版本".into()))?;
        self.tree_flat = build_shadow_tree(&prev);
        self.tree = prev;
        Ok(())
    }

    /// 应用搜索过滤，只显示路径或键名匹配的行
    pub fn apply_search_filter(&mut self, filter: &str) {
        if filter.trim().is_empty() {
            // 清空过滤，显示所有行
            for row in &mut self.tree_flat {
                row.visible = true;
            }
        } else {
            for row in &mut self.tree_flat {
                row.visible = row.path.contains(filter) || row.name.contains(filter);
            }
        }
    }

    /// 切换行的展开状态并重算可见性
    pub fn toggle_node_expanded(&mut self, path: &str) {
        if let Some(row) = self.tree_flat.iter_mut().find(|r| r.path == path) {
            row.expanded = !row.expanded;
        }
        self.update_visibility_by_expansion();
    }

    /// 根据展开状态更新可见性：只有展开祖先链上的行可见
    pub fn update_visibility_by_expansion(&mut self) {
        // 先全部隐藏（根行除外）
        for (i, row) in self.tree_flat.iter_mut().enumerate() {
            row.visible = i == 0;
        }

        // 行按DFS序排列，父行先于子行被处理
        for i in 0..self.tree_flat.len() {
            if self.tree_flat[i].expanded && self.tree_flat[i].visible {
                let parent_depth = self.tree_flat[i].depth;
                for j in (i + 1)..self.tree_flat.len() {
                    if self.tree_flat[j].depth == parent_depth + 1 {
                        self.tree_flat[j].visible = true;
                    } else if self.tree_flat[j].depth <= parent_depth {
                        break; // 已经超出当前父行的范围
                    }
                }
            }
        }
    }

    /// 作用域路径："$" 表示根，其余按点号解析
    fn parse_scope_path(text: &str) -> Result<KeyPath, AppError> {
        if text == ROOT_LABEL {
            return Ok(KeyPath::root());
        }
        Ok(KeyPath::parse(text)?)
    }
}
