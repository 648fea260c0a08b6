//! 俄罗斯邮政地址规范化
//!
//! 把自由输入的地址文本转换为可比较、可去重、可按多种风格打印的规范形式。
//!
//! ## 处理流程
//! 1. 分词 + 合并 proto-word（"ул."、"р-н"、"41А"）
//! 2. 清洗：数字、门牌字母、姓名首字母、地名类别词、地名形容词
//! 3. 按层级标准化（地区 → 区 → 居民点 → 街道 → 房屋 → 房屋部分）
//! 4. 打印：标准化失败时回退到清洗结果
//! 5. 分片键（地理编码词典分片）

mod cleaned;
mod engine;
mod printer;
mod rules;
mod slice;
mod standardized;
mod tokenizer;
mod types;

pub use cleaned::build_cleaned_address_ast;
pub use engine::{normalize_address, strip_default_region, AddressNormalizer};
pub use printer::{
    print_cleaned_address_ast, print_standardized_address_ast, print_standardized_address_section,
};
pub use rules::{
    AddressRules, DesignationAdjectiveConfig, DesignationAdjectiveTable, DesignationTable,
    OrdinalNumberEndingTable,
};
pub use slice::{derive_normalized_address_slice_id, dictionary_file_path};
pub use standardized::{build_standardized_address_ast, AddressInterpretationError};
pub use tokenizer::{extract_tokens, make_proto_words, AddressToken, AddressTokenType};
pub use types::{
    AddressWord, CleanedAddressAst, CleanedAddressNode, Designation, DesignationConfig,
    FinalizeWordSpelling, Gender, ReorderWordsInSection, SectionType, SeparatorType,
    StandardizedAddressAst, WordType,
};
