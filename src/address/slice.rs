//! 分片键
//!
//! 由已规范化的地址推导地理编码词典的分片目录名。
//! 标准化成功时为 `standardized/<地区>/<居民点>/<街道>`，
//! 否则为 `cleaned/<每个未分类词的首字符>`

use std::path::{Path, PathBuf};

use crate::address::cleaned::build_cleaned_address_ast;
use crate::address::printer::print_standardized_address_section;
use crate::address::rules::AddressRules;
use crate::address::standardized::build_standardized_address_ast;
use crate::address::types::{SectionType, WordType};
use crate::config::AddressNormalizationConfig;

/// 参与分片的分段
const SLICE_SECTIONS: [SectionType; 3] = [
    SectionType::Region,
    SectionType::Settlement,
    SectionType::StreetOrPlace,
];

const DICTIONARY_FILE_NAME: &str = "dictionary.json";

/// 推导分片键
pub fn derive_normalized_address_slice_id(
    normalized_address: &str,
    config: &AddressNormalizationConfig,
    rules: &AddressRules,
) -> String {
    let cleaned = build_cleaned_address_ast(normalized_address, rules);

    let slices: Vec<String> = match build_standardized_address_ast(&cleaned, config, rules) {
        Ok(standardized) => std::iter::once("standardized".to_string())
            .chain(SLICE_SECTIONS.iter().filter_map(|&section_type| {
                standardized
                    .section(section_type)
                    .map(|nodes| print_standardized_address_section(nodes, None))
            }))
            .collect(),
        Err(_) => std::iter::once("cleaned".to_string())
            .chain(
                cleaned
                    .words()
                    .filter(|w| w.word_type == WordType::Unclassified)
                    .filter_map(|w| w.value.chars().next())
                    .map(String::from),
            )
            .collect(),
    };

    slices
        .iter()
        .map(|slice| slice.replace('/', ""))
        .collect::<Vec<_>>()
        .join("/")
}

/// 分片词典文件路径：`<root>/<slice_id>/dictionary.json`
pub fn dictionary_file_path(root: &Path, slice_id: &str) -> PathBuf {
    root.join(slice_id).join(DICTIONARY_FILE_NAME)
}
