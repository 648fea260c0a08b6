//! 清洗地址 AST 构建
//!
//! 对节点序列按固定顺序执行改写：每一步都依赖前一步留下的规范化状态，
//! 只合并、拆分或重新标注节点，从不调整节点顺序

use lazy_static::lazy_static;
use regex::Regex;

use crate::address::rules::AddressRules;
use crate::address::tokenizer::{extract_tokens, make_proto_words, AddressToken, AddressTokenType};
use crate::address::types::{
    AddressWord, CleanedAddressAst, CleanedAddressNode, DesignationConfig, SeparatorType, WordType,
};

lazy_static! {
    // 数字 + 可选词尾 + 可选末尾字符（通常是句点）
    static ref NUMBER_WITH_ENDING_RE: Regex = Regex::new(r"^([0-9]+)([^.]*).?$").unwrap();
}

/// 看起来像地名形容词的词尾（"Новая"、"Заречный"）
const ADJECTIVE_LIKE_SUFFIXES: [&str; 5] = ["ая", "ый", "ое", "нка", "вка"];

/// 构建清洗后的地址 AST
pub fn build_cleaned_address_ast(raw_address: &str, rules: &AddressRules) -> CleanedAddressAst {
    let tokens = make_proto_words(extract_tokens(raw_address));

    // 1-2. 合并分隔符并去掉首尾分隔符
    let tokens = filter_tokens(tokens);

    // 3. 生成初始节点
    let nodes = materialize_nodes(tokens);

    // 4. "30 - летия" → "30-летия"
    let nodes = stitch_number_dash_word(nodes);

    // 5. 基数词与序数词
    let nodes = extract_numbers(nodes, rules);

    // 6. "10корп" → "10" + "корп"
    let nodes = detach_number_suffixes(nodes);

    // 7. "10 Б" → "10Б"
    let nodes = attach_single_letter_suffixes(nodes);

    // 8. 只有两个基数之间的横杠才有意义
    let nodes = demote_dashes(nodes);

    // 9. "И. О. Фамилия"
    let nodes = detect_initial_pairs(nodes);

    // 10. 地名类别词
    let nodes = detect_designations(nodes, rules);

    // 11. "ул. К. Маркса"
    let nodes = detect_single_initials(nodes);

    // 12. "мал." → "малая"
    let nodes = expand_designation_adjectives(nodes, rules);

    // 13. 去掉未分类词末尾的句点
    let nodes = strip_trailing_periods(nodes);

    CleanedAddressAst { children: nodes }
}

fn word_at(nodes: &[CleanedAddressNode], index: usize) -> Option<&AddressWord> {
    nodes.get(index).and_then(CleanedAddressNode::as_word)
}

fn is_word_of(nodes: &[CleanedAddressNode], index: usize, word_type: WordType) -> bool {
    nodes.get(index).is_some_and(|n| n.is_word_of(word_type))
}

/// 单个字母或 "字母."
fn can_be_initial(nodes: &[CleanedAddressNode], index: usize) -> bool {
    word_at(nodes, index).is_some_and(|word| {
        if word.word_type != WordType::Unclassified {
            return false;
        }
        let mut chars = word.value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(_), None, _) => true,
            (Some(_), Some('.'), None) => true,
            _ => false,
        }
    })
}

fn looks_like_designation_adjective(nodes: &[CleanedAddressNode], index: usize) -> bool {
    word_at(nodes, index).is_some_and(|word| {
        let lower = word.value.trim_end_matches('.').to_lowercase();
        word.word_type == WordType::Unclassified
            && ADJECTIVE_LIKE_SUFFIXES.iter().any(|s| lower.ends_with(s))
    })
}

fn to_initial(word: &mut AddressWord) {
    let first = word.value.chars().next().map(String::from).unwrap_or_default();
    word.retag(WordType::Initial);
    word.value = format!("{}.", first);
}

fn filter_tokens(tokens: Vec<AddressToken>) -> Vec<AddressToken> {
    let mut filtered: Vec<AddressToken> = Vec::with_capacity(tokens.len());

    for token in tokens {
        if token.token_type.is_word() {
            filtered.push(token);
            continue;
        }
        if !token.token_type.is_separator() {
            continue;
        }

        // 连续分隔符合并为逗号
        if let Some(last) = filtered.last_mut() {
            if last.token_type.is_separator() {
                *last = AddressToken::new(AddressTokenType::Comma, ",");
                continue;
            }
        }

        // 括号视为逗号
        if token.token_type == AddressTokenType::Bracket {
            filtered.push(AddressToken::new(AddressTokenType::Comma, ","));
            continue;
        }

        filtered.push(token);
    }

    let Some(first) = filtered.iter().position(|t| !t.token_type.is_separator()) else {
        return Vec::new();
    };
    let last = filtered
        .iter()
        .rposition(|t| !t.token_type.is_separator())
        .unwrap_or(first);

    filtered.truncate(last + 1);
    filtered.drain(..first);
    filtered
}

fn materialize_nodes(tokens: Vec<AddressToken>) -> Vec<CleanedAddressNode> {
    tokens
        .into_iter()
        .map(|token| match token.token_type {
            AddressTokenType::NumberSequence => CleanedAddressNode::Word(AddressWord::number(
                WordType::CardinalNumber,
                &token.value,
                "",
            )),
            t if t.is_word() => CleanedAddressNode::Word(AddressWord::unclassified(token.value)),
            AddressTokenType::Dash => CleanedAddressNode::separator(SeparatorType::Dash),
            AddressTokenType::Slash => CleanedAddressNode::separator(SeparatorType::Slash),
            _ => CleanedAddressNode::separator(SeparatorType::Comma),
        })
        .collect()
}

fn stitch_number_dash_word(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    let mut index = 0;
    while index + 2 < nodes.len() {
        let stitched = match (word_at(&nodes, index), word_at(&nodes, index + 2)) {
            (Some(number), Some(word))
                if number.word_type == WordType::CardinalNumber
                    && nodes[index + 1].is_separator_of(SeparatorType::Dash)
                    && word.word_type == WordType::Unclassified
                    && !word.value.chars().any(|c| c.is_ascii_digit()) =>
            {
                Some(format!("{}-{}", number.value, word.value))
            }
            _ => None,
        };

        if let Some(value) = stitched {
            nodes.splice(
                index..index + 3,
                [CleanedAddressNode::Word(AddressWord::unclassified(value))],
            );
        }
        index += 1;
    }
    nodes
}

fn extract_numbers(mut nodes: Vec<CleanedAddressNode>, rules: &AddressRules) -> Vec<CleanedAddressNode> {
    let len = nodes.len();
    for (index, node) in nodes.iter_mut().enumerate() {
        let Some(word) = node.as_word_mut() else {
            continue;
        };
        if word.word_type != WordType::Unclassified {
            continue;
        }
        let (digits, ending) = match NUMBER_WITH_ENDING_RE.captures(&word.value) {
            Some(captures) => (captures[1].to_string(), captures[2].to_string()),
            None => continue,
        };

        // 地址可能以 "42-Е" 结尾，这是基数：只有后面还有内容时才可能是序数
        let replacement = if index + 1 == len {
            let ending = ending.strip_prefix('-').unwrap_or(&ending);
            AddressWord::number(WordType::CardinalNumber, &digits, ending)
        } else if let Some(normalized) = rules.ordinal_number_endings.normalize(&ending) {
            AddressWord::number(WordType::OrdinalNumber, &digits, normalized)
        } else {
            AddressWord::number(WordType::CardinalNumber, &digits, &ending)
        };
        *word = replacement;
    }
    nodes
}

fn detach_number_suffixes(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    for index in (0..nodes.len()).rev() {
        let Some(word) = nodes[index].as_word_mut() else {
            continue;
        };
        if word.word_type != WordType::CardinalNumber {
            continue;
        }

        let ending = word.ending_str();
        if ending.chars().count() <= 1 || ending.starts_with('-') {
            continue;
        }

        let detached = AddressWord::unclassified(ending);
        let digits = word.number.clone().unwrap_or_default();
        *word = AddressWord::number(WordType::CardinalNumber, &digits, "");
        nodes.insert(index + 1, CleanedAddressNode::Word(detached));
    }
    nodes
}

fn attach_single_letter_suffixes(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    if nodes.len() < 2 {
        return nodes;
    }

    for index in (0..nodes.len() - 1).rev() {
        let bare_number =
            word_at(&nodes, index).is_some_and(|w| w.word_type == WordType::CardinalNumber && w.ending_str().is_empty());
        // "Б" 或 "Б."，句点不进入词尾
        let letter = word_at(&nodes, index + 1)
            .filter(|w| w.word_type == WordType::Unclassified)
            .map(|w| w.value.strip_suffix('.').unwrap_or(&w.value))
            .filter(|letter| letter.chars().count() == 1)
            .map(str::to_string);

        let (true, Some(letter)) = (bare_number, letter) else {
            continue;
        };
        // "10 к 10" 是编号组合，不是门牌字母
        if is_word_of(&nodes, index + 2, WordType::CardinalNumber) {
            continue;
        }

        nodes.remove(index + 1);
        if let Some(number) = nodes[index].as_word_mut() {
            number.value.push_str(&letter);
            number.ending = Some(letter);
        }
    }
    nodes
}

fn demote_dashes(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    for index in 0..nodes.len() {
        if !nodes[index].is_separator_of(SeparatorType::Dash) {
            continue;
        }
        let between_numbers = index > 0
            && is_word_of(&nodes, index - 1, WordType::CardinalNumber)
            && is_word_of(&nodes, index + 1, WordType::CardinalNumber);
        if !between_numbers {
            nodes[index] = CleanedAddressNode::separator(SeparatorType::Comma);
        }
    }
    nodes
}

fn detect_initial_pairs(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    let mut index = 0;
    while index + 2 < nodes.len() {
        if can_be_initial(&nodes, index)
            && can_be_initial(&nodes, index + 1)
            && is_word_of(&nodes, index + 2, WordType::Unclassified)
        {
            for node in &mut nodes[index..index + 2] {
                if let Some(word) = node.as_word_mut() {
                    to_initial(word);
                }
            }
        }
        index += 1;
    }
    nodes
}

/// 大写单字母（"К."、"С"）是姓名首字母，不是 "к"、"с" 之类的缩写
fn is_capital_letter(value: &str) -> bool {
    let mut chars = value.trim_end_matches('.').chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn detect_designations(mut nodes: Vec<CleanedAddressNode>, rules: &AddressRules) -> Vec<CleanedAddressNode> {
    for index in 0..nodes.len() {
        if index > 0 && is_word_of(&nodes, index - 1, WordType::Designation) {
            continue;
        }
        let Some(word) = nodes[index].as_word_mut() else {
            continue;
        };
        if word.word_type != WordType::Unclassified || is_capital_letter(&word.value) {
            continue;
        }
        if let Some(config) = rules.designations.find(&word.value) {
            word.retag(WordType::Designation);
            word.value = config.normalized_value.to_string();
        }
    }
    nodes
}

fn detect_single_initials(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    // 窗口为四个节点，形容词判断之后还要有内容
    let mut index = 0;
    while index + 3 < nodes.len() {
        if is_word_of(&nodes, index, WordType::Designation)
            && can_be_initial(&nodes, index + 1)
            && is_word_of(&nodes, index + 2, WordType::Unclassified)
            && !looks_like_designation_adjective(&nodes, index + 2)
        {
            if let Some(word) = nodes[index + 1].as_word_mut() {
                to_initial(word);
            }
        }
        index += 1;
    }
    nodes
}

fn first_designation_in_run<'a>(
    run: impl Iterator<Item = &'a CleanedAddressNode>,
) -> Option<&'a AddressWord> {
    run.take_while(|n| !n.is_separator())
        .filter_map(CleanedAddressNode::as_word)
        .find(|w| w.word_type == WordType::Designation)
}

/// 查找形容词所修饰的地名类别词：先向左，再向右，不跨越分隔符
fn find_relevant_designation<'r>(
    nodes: &[CleanedAddressNode],
    index: usize,
    rules: &'r AddressRules,
) -> Option<&'r DesignationConfig> {
    first_designation_in_run(nodes[..index].iter().rev())
        .or_else(|| first_designation_in_run(nodes[index + 1..].iter()))
        .and_then(|word| rules.designations.find(&word.value))
}

/// 保留原词的首字母大写
fn match_case(original: &str, replacement: &str) -> String {
    if !original.chars().next().is_some_and(char::is_uppercase) {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn expand_designation_adjectives(
    mut nodes: Vec<CleanedAddressNode>,
    rules: &AddressRules,
) -> Vec<CleanedAddressNode> {
    let adjectives = &rules.designation_adjectives;

    for index in 0..nodes.len() {
        let Some(word) = word_at(&nodes, index) else {
            continue;
        };
        if word.word_type != WordType::Unclassified {
            continue;
        }
        let Some(config) = adjectives.find(&word.value) else {
            continue;
        };

        // 已是完整形式则保持原样；找不到类别词则保留缩写
        let expanded = if adjectives.is_normalized(&word.value) {
            None
        } else {
            find_relevant_designation(&nodes, index, rules)
                .map(|designation| match_case(&word.value, config.normalized_value(designation.gender)))
        };

        if let Some(word) = nodes[index].as_word_mut() {
            word.retag(WordType::DesignationAdjective);
            if let Some(value) = expanded {
                word.value = value;
            }
        }
    }
    nodes
}

fn strip_trailing_periods(mut nodes: Vec<CleanedAddressNode>) -> Vec<CleanedAddressNode> {
    for node in &mut nodes {
        if let Some(word) = node.as_word_mut() {
            if word.word_type == WordType::Unclassified {
                if let Some(stripped) = word.value.strip_suffix('.') {
                    word.value = stripped.to_string();
                }
            }
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &str) -> CleanedAddressAst {
        build_cleaned_address_ast(raw, &AddressRules::new())
    }

    fn words(ast: &CleanedAddressAst) -> Vec<(WordType, &str)> {
        ast.words().map(|w| (w.word_type, w.value.as_str())).collect()
    }

    fn separators(ast: &CleanedAddressAst) -> Vec<SeparatorType> {
        ast.children
            .iter()
            .filter_map(|n| match n {
                CleanedAddressNode::Separator { separator_type } => Some(*separator_type),
                CleanedAddressNode::Word(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_street_with_house_number() {
        let ast = build("ул. Ленина, 10");
        assert_eq!(
            words(&ast),
            vec![
                (WordType::Designation, "улица"),
                (WordType::Unclassified, "Ленина"),
                (WordType::CardinalNumber, "10"),
            ]
        );
        assert!(ast.children[2].is_separator_of(SeparatorType::Comma));

        let number = ast.children[3].as_word().unwrap();
        assert_eq!(number.number.as_deref(), Some("10"));
        assert_eq!(number.ending.as_deref(), Some(""));
    }

    #[test]
    fn test_single_letter_suffix_attached() {
        let ast = build("дом 41 А");
        assert_eq!(ast.children.len(), 2);
        let number = ast.children[1].as_word().unwrap();
        assert_eq!(number.word_type, WordType::CardinalNumber);
        assert_eq!(number.value, "41А");
        assert_eq!(number.ending.as_deref(), Some("А"));
    }

    #[test]
    fn test_fused_abbreviation_detached() {
        let ast = build("10корп");
        assert_eq!(
            words(&ast),
            vec![(WordType::CardinalNumber, "10"), (WordType::Unclassified, "корп")]
        );
        let number = ast.children[0].as_word().unwrap();
        assert_eq!(number.ending.as_deref(), Some(""));
    }

    #[test]
    fn test_dash_between_words_demoted() {
        let ast = build("г. Пенза - ул. Московская");
        assert_eq!(separators(&ast), vec![SeparatorType::Comma]);
        assert_eq!(
            words(&ast),
            vec![
                (WordType::Designation, "город"),
                (WordType::Unclassified, "Пенза"),
                (WordType::Designation, "улица"),
                (WordType::Unclassified, "Московская"),
            ]
        );
    }

    #[test]
    fn test_dash_between_numbers_kept() {
        let ast = build("д. 10 - 12");
        assert_eq!(separators(&ast), vec![SeparatorType::Dash]);
        let ast = build("ул. Ленина - 5");
        assert_eq!(separators(&ast), vec![SeparatorType::Comma]);
    }

    #[test]
    fn test_initial_pair() {
        let ast = build("И. О. Иванов");
        assert_eq!(
            words(&ast),
            vec![
                (WordType::Initial, "И."),
                (WordType::Initial, "О."),
                (WordType::Unclassified, "Иванов"),
            ]
        );
        let ast = build("ул. И О Иванова");
        assert_eq!(words(&ast)[1], (WordType::Initial, "И."));
        assert_eq!(words(&ast)[2], (WordType::Initial, "О."));
    }

    #[test]
    fn test_single_initial_after_designation() {
        let ast = build("ул. К. Маркса, 5");
        assert_eq!(words(&ast)[1], (WordType::Initial, "К."));

        // 窗口末尾没有第四个节点
        let ast = build("ул. К. Маркса");
        assert_eq!(words(&ast)[1], (WordType::Unclassified, "К"));

        // 形容词前的单字母不是姓名首字母
        let ast = build("ул. К. Новая, 5");
        assert_eq!(words(&ast)[1], (WordType::Unclassified, "К"));
    }

    #[test]
    fn test_separators_normalized_and_trimmed() {
        let ast = build(" , - ул. Ленина ,- (центр) ");
        assert!(!ast.children.first().unwrap().is_separator());
        assert!(!ast.children.last().unwrap().is_separator());
        assert_eq!(separators(&ast), vec![SeparatorType::Comma]);
        assert_eq!(words(&ast).last(), Some(&(WordType::Unclassified, "центр")));
    }

    #[test]
    fn test_only_separators() {
        assert!(!build("-").has_words());
        assert!(!build(" ,;- () ").has_words());
        assert!(build("").children.is_empty());
    }

    #[test]
    fn test_anniversary_stitched() {
        let ast = build("ул. 30 - летия Победы, 5");
        assert_eq!(words(&ast)[1], (WordType::CardinalNumber, "30-летия"));
        assert_eq!(words(&ast)[2], (WordType::Unclassified, "Победы"));

        let ast = build("ул. 30-летия Победы");
        assert_eq!(words(&ast)[1], (WordType::CardinalNumber, "30-летия"));
    }

    #[test]
    fn test_ordinal_numbers() {
        let ast = build("42-ой проезд, 1");
        assert_eq!(words(&ast)[0], (WordType::OrdinalNumber, "42-й"));
        let ordinal = ast.children[0].as_word().unwrap();
        assert_eq!(ordinal.number.as_deref(), Some("42"));
        assert_eq!(ordinal.ending.as_deref(), Some("-й"));

        let ast = build("2-ая Садовая ул.");
        assert_eq!(words(&ast)[0], (WordType::OrdinalNumber, "2-я"));
    }

    #[test]
    fn test_trailing_number_is_cardinal() {
        let ast = build("ул. Ленина, 42-Е");
        let last = ast.words().last().unwrap();
        assert_eq!(last.word_type, WordType::CardinalNumber);
        assert_eq!(last.value, "42Е");
        assert_eq!(last.ending.as_deref(), Some("Е"));
    }

    #[test]
    fn test_compound_numbering() {
        let ast = build("д. 10к10");
        assert_eq!(
            words(&ast),
            vec![
                (WordType::Designation, "дом"),
                (WordType::CardinalNumber, "10"),
                (WordType::Designation, "корпус"),
                (WordType::CardinalNumber, "10"),
            ]
        );
    }

    #[test]
    fn test_three_single_letters() {
        // 只有紧跟数字的第一个字母被吸收
        let ast = build("5 а б");
        assert_eq!(
            words(&ast),
            vec![(WordType::CardinalNumber, "5а"), (WordType::Unclassified, "б")]
        );
    }

    #[test]
    fn test_single_letter_with_period_attached() {
        let ast = build("д. 10 Б.");
        assert_eq!(
            words(&ast),
            vec![(WordType::Designation, "дом"), (WordType::CardinalNumber, "10Б")]
        );
        let number = ast.children[1].as_word().unwrap();
        assert_eq!(number.ending.as_deref(), Some("Б"));
    }

    #[test]
    fn test_capital_letter_is_not_designation() {
        let ast = build("К. Маркса ул., 5");
        assert_eq!(words(&ast)[0], (WordType::Unclassified, "К"));
        assert_eq!(words(&ast)[2], (WordType::Designation, "улица"));

        let ast = build("С. Разина ул.");
        assert_eq!(words(&ast)[0], (WordType::Unclassified, "С"));

        // 小写缩写不受影响
        let ast = build("г. Пенза, д. 5 к 2");
        assert_eq!(words(&ast)[0], (WordType::Designation, "город"));
        assert_eq!(words(&ast)[4], (WordType::Designation, "корпус"));
    }

    #[test]
    fn test_letter_before_number_not_attached() {
        let ast = build("10 А 2");
        assert_eq!(
            words(&ast),
            vec![
                (WordType::CardinalNumber, "10"),
                (WordType::Unclassified, "А"),
                (WordType::CardinalNumber, "2"),
            ]
        );
    }

    #[test]
    fn test_consecutive_designations_tagged_once() {
        let ast = build("проезд улица Ленина");
        assert_eq!(words(&ast)[0], (WordType::Designation, "проезд"));
        assert_eq!(words(&ast)[1], (WordType::Unclassified, "улица"));
    }

    #[test]
    fn test_designation_adjective_expanded() {
        let ast = build("ул. Мал. Покровская, 3");
        assert_eq!(words(&ast)[1], (WordType::DesignationAdjective, "Малая"));

        // 类别词在右侧
        let ast = build("Бол. Садовый пер.");
        assert_eq!(words(&ast)[0], (WordType::DesignationAdjective, "Большой"));

        let ast = build("нов. шоссе");
        assert_eq!(words(&ast)[0], (WordType::DesignationAdjective, "новое"));
    }

    #[test]
    fn test_designation_adjective_without_designation() {
        let ast = build("Мал. Покровская");
        assert_eq!(words(&ast)[0], (WordType::DesignationAdjective, "Мал."));

        // 逗号之外的类别词不参与性别一致
        let ast = build("Мал., улица");
        assert_eq!(words(&ast)[0], (WordType::DesignationAdjective, "Мал."));
    }

    #[test]
    fn test_normalized_adjective_kept() {
        let ast = build("Малый пр-кт");
        assert_eq!(words(&ast)[0], (WordType::DesignationAdjective, "Малый"));
        assert_eq!(words(&ast)[1], (WordType::Designation, "проспект"));
    }

    #[test]
    fn test_trailing_period_stripped() {
        let ast = build("дер. Ивановка, Центр.");
        assert_eq!(words(&ast).last(), Some(&(WordType::Unclassified, "Центр")));
    }

    #[test]
    fn test_looks_like_building_address() {
        assert!(build("ул. Такая-то, 10").looks_like_building_address());
        assert!(!build("Дом культуры").looks_like_building_address());
        assert!(!build("10 лет Октября ул.").looks_like_building_address());
    }

    #[test]
    fn test_word_count_never_exceeds_raw_tokens() {
        let samples = [
            "ул. Ленина, 10",
            "10корп 2",
            "дом 41 А",
            "42-й проезд",
            "г. Пенза - ул. Московская, 10/2",
            "д. 10к10 кв 5",
            "ул. 30 - летия Победы",
        ];
        for raw in samples {
            let raw_word_tokens = extract_tokens(raw)
                .iter()
                .filter(|t| t.token_type.is_word())
                .count();
            assert!(build(raw).words().count() <= raw_word_tokens, "{}", raw);
        }
    }
}
