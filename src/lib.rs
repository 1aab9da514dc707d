//! 翻译树工具库
//!
//! 层级翻译数据（本地化字典）的路径寻址树模型：按路径读写删、
//! 子树移动变换、两种互换的序列化格式（行式缩进标记与结构化文档）
//! 与重复值检测。核心全部是纯函数，终端 shell 只负责串行化用户
//! 操作与展示结果。

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppError, AppState, DataFormat, ExportPayload};
pub use model::node::{Node, NodeKind};
pub use model::path::{KeyPath, PathError};
pub use model::shadow_tree::{build_shadow_tree, TreeRow};
