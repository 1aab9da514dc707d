//! IO helper: 导入导出用的文本文件读写

use std::{fs, path::Path};

use crate::model::data_core::AppError;

/// 读取整个文本文件
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(p)?)
}

/// 把文本写入文件（整体覆盖）
pub fn write_text_file(p: &Path, text: &str) -> Result<(), AppError> {
    fs::write(p, text)?;
    Ok(())
}
