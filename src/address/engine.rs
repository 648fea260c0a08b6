//! 地址规范化主引擎
//!
//! 组合分词、清洗、按层级标准化与打印；无法标准化时回退到清洗结果

use crate::address::cleaned::build_cleaned_address_ast;
use crate::address::printer::{print_cleaned_address_ast, print_standardized_address_ast};
use crate::address::rules::AddressRules;
use crate::address::slice::derive_normalized_address_slice_id;
use crate::address::standardized::build_standardized_address_ast;
use crate::address::types::{CleanedAddressAst, FinalizeWordSpelling, ReorderWordsInSection};
use crate::config::AddressNormalizationConfig;

/// 规范化地址
///
/// 空白输入或只有分隔符的输入返回 `None`；
/// 无法按层级解释时返回清洗后的地址（只应用拼写钩子）
pub fn normalize_address(
    raw_address: &str,
    config: &AddressNormalizationConfig,
    rules: &AddressRules,
    reorder: Option<&ReorderWordsInSection>,
    finalize: Option<&FinalizeWordSpelling>,
) -> Option<String> {
    if raw_address.trim().is_empty() {
        return None;
    }

    // 1. 清洗
    let cleaned = build_cleaned_address_ast(raw_address, rules);
    if !cleaned.has_words() {
        return None;
    }

    // 2. 按层级标准化，失败则回退
    match build_standardized_address_ast(&cleaned, config, rules) {
        Ok(standardized) => Some(print_standardized_address_ast(&standardized, reorder, finalize)),
        Err(e) => {
            tracing::debug!("地址无法标准化，使用清洗结果: {:?} ({})", raw_address, e);
            Some(print_cleaned_address_ast(&cleaned, finalize))
        }
    }
}

/// 去掉地址开头的默认地区（比较时忽略大小写）
pub fn strip_default_region(
    address: &str,
    config: &AddressNormalizationConfig,
    rules: &AddressRules,
) -> String {
    let Some(default_region) = config.default_region() else {
        return address.to_string();
    };
    let region = print_cleaned_address_ast(&build_cleaned_address_ast(default_region, rules), None);
    if region.is_empty() {
        return address.to_string();
    }

    let prefix = format!("{}, ", region);
    let mut rest = address.char_indices();
    for expected in prefix.chars() {
        match rest.next() {
            Some((_, actual)) if actual.to_lowercase().eq(expected.to_lowercase()) => {}
            _ => return address.to_string(),
        }
    }

    rest.as_str().to_string()
}

/// 地址规范化引擎（可复用，规则表只构建一次）
#[derive(Default)]
pub struct AddressNormalizer {
    rules: AddressRules,
    config: AddressNormalizationConfig,
}

impl AddressNormalizer {
    /// 创建引擎
    ///
    /// # Arguments
    /// * `config` - 规范化配置（默认地区等）
    pub fn new(config: AddressNormalizationConfig) -> Self {
        Self {
            rules: AddressRules::new(),
            config,
        }
    }

    pub fn config(&self) -> &AddressNormalizationConfig {
        &self.config
    }

    pub fn rules(&self) -> &AddressRules {
        &self.rules
    }

    /// 规范化地址（不带钩子）
    pub fn normalize(&self, raw_address: &str) -> Option<String> {
        self.normalize_with(raw_address, None, None)
    }

    pub fn normalize_with(
        &self,
        raw_address: &str,
        reorder: Option<&ReorderWordsInSection>,
        finalize: Option<&FinalizeWordSpelling>,
    ) -> Option<String> {
        normalize_address(raw_address, &self.config, &self.rules, reorder, finalize)
    }

    /// 仅清洗，不做标准化
    pub fn clean(&self, raw_address: &str) -> CleanedAddressAst {
        build_cleaned_address_ast(raw_address, &self.rules)
    }

    /// 推导分片键（输入应为已规范化的地址）
    pub fn derive_slice_id(&self, normalized_address: &str) -> String {
        derive_normalized_address_slice_id(normalized_address, &self.config, &self.rules)
    }

    pub fn strip_default_region(&self, address: &str) -> String {
        strip_default_region(address, &self.config, &self.rules)
    }
}
