//! 地址规则表
//!
//! 包含地名类别词表、序数词尾表、地名形容词表。
//! 表在启动时构建一次，之后只读

use std::collections::HashMap;

use crate::address::types::{Designation, DesignationConfig, Gender};

/// 查表键：小写、去掉末尾句点、ё → е
fn lookup_key(word: &str) -> String {
    word.trim_end_matches('.').to_lowercase().replace('ё', "е")
}

/// 地名类别词表
pub struct DesignationTable {
    configs: Vec<DesignationConfig>,
    /// 规范写法或别名 → configs 下标
    lookup: HashMap<String, usize>,
}

impl DesignationTable {
    pub fn new() -> Self {
        use Designation::*;
        use Gender::*;

        // 参考: https://wiki.openstreetmap.org/wiki/RU:Россия/Соглашение_об_именовании_дорог
        let entries: &[(&'static str, Designation, Gender, &[&'static str])] = &[
            ("федерация", Country, Feminine, &["рф"]),
            ("республика", Region, Feminine, &["респ"]),
            ("область", Region, Feminine, &["обл"]),
            ("край", Region, Masculine, &[]),
            ("сельсовет", County, Masculine, &["с/с"]),
            ("район", District, Masculine, &["р-н"]),
            ("город", Settlement, Masculine, &["г", "гор"]),
            ("село", Settlement, Neuter, &["с"]),
            ("поселение", Settlement, Neuter, &[]),
            ("поселок", Settlement, Masculine, &["пос", "п"]),
            ("деревня", Settlement, Feminine, &["дер"]),
            ("лесничество", Settlement, Neuter, &["лес-во", "лесн-во"]),
            ("городок", Place, Masculine, &[]),
            ("микрорайон", Place, Masculine, &["мкр", "мкрн", "мкр-н"]),
            ("бульвар", Street, Masculine, &["бульв", "б-р"]),
            ("километр", Street, Masculine, &["км"]),
            ("набережная", Street, Feminine, &["наб"]),
            ("овраг", Street, Masculine, &[]),
            ("переулок", Street, Masculine, &["пер"]),
            ("площадь", Street, Feminine, &["пл"]),
            ("проезд", Street, Masculine, &["пр"]),
            ("проспект", Street, Masculine, &["пр-кт", "просп"]),
            // садовое некоммерческое товарищество
            ("снт", Street, Neuter, &["с/т"]),
            ("совхоз", Street, Masculine, &[]),
            ("станция", Street, Feminine, &["ст"]),
            ("территория", Street, Feminine, &["тер"]),
            ("тупик", Street, Masculine, &["туп"]),
            ("улица", Street, Feminine, &["ул"]),
            ("шоссе", Street, Neuter, &["ш"]),
            ("аллея", Street, Feminine, &["ал"]),
            ("дом", House, Masculine, &["д"]),
            ("здание", House, Neuter, &["зд"]),
            ("владение", House, Neuter, &["вл"]),
            ("строение", HousePart, Neuter, &["стр"]),
            ("блок", HousePart, Masculine, &[]),
            ("гараж", HousePart, Masculine, &[]),
            ("квартира", HousePart, Feminine, &["кв"]),
            ("корпус", HousePart, Masculine, &["к"]),
            ("литера", HousePart, Feminine, &["лит"]),
            ("помещение", HousePart, Neuter, &["пом"]),
            ("сарай", HousePart, Masculine, &["сар"]),
        ];

        let mut configs = Vec::with_capacity(entries.len());
        let mut lookup = HashMap::new();
        for (index, &(normalized_value, designation, gender, aliases)) in
            entries.iter().enumerate()
        {
            lookup.insert(lookup_key(normalized_value), index);
            for alias in aliases {
                lookup.insert(lookup_key(alias), index);
            }
            configs.push(DesignationConfig {
                normalized_value,
                designation,
                gender,
                aliases: aliases.to_vec(),
            });
        }

        Self { configs, lookup }
    }

    /// 按任意写法查找（"Ул."、"улица"、"р-н"）
    pub fn find(&self, word: &str) -> Option<&DesignationConfig> {
        self.lookup
            .get(&lookup_key(word))
            .and_then(|&index| self.configs.get(index))
    }

    /// 获取所有配置
    pub fn all(&self) -> &[DesignationConfig] {
        &self.configs
    }
}

impl Default for DesignationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 序数词尾表（"42-ой" → "42-й"）
pub struct OrdinalNumberEndingTable {
    map: HashMap<&'static str, &'static str>,
}

impl OrdinalNumberEndingTable {
    pub fn new() -> Self {
        let groups: &[(&'static str, &[&'static str])] = &[
            ("-й", &["-й", "й", "-ый", "ый", "-ий", "ий", "-ой", "ой"]),
            ("-я", &["-я", "я", "-ая", "ая", "-яя", "яя"]),
            // 单独的 "е" 是门牌字母（"42Е"），不算序数
            ("-е", &["-е", "-ое", "ое", "-ее", "ее"]),
            ("-го", &["-го", "го", "-ого", "ого", "-его"]),
        ];

        let map = groups
            .iter()
            .flat_map(|&(normalized, raw)| raw.iter().map(move |r| (*r, normalized)))
            .collect();

        Self { map }
    }

    /// 返回规范化后的词尾
    pub fn normalize(&self, ending: &str) -> Option<&'static str> {
        self.map.get(ending.to_lowercase().as_str()).copied()
    }
}

impl Default for OrdinalNumberEndingTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 地名形容词的完整形式（按性别）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignationAdjectiveConfig {
    pub masculine: &'static str,
    pub feminine: &'static str,
    pub neuter: &'static str,
}

impl DesignationAdjectiveConfig {
    pub fn normalized_value(&self, gender: Gender) -> &'static str {
        match gender {
            Gender::Masculine => self.masculine,
            Gender::Feminine => self.feminine,
            Gender::Neuter => self.neuter,
        }
    }

    fn forms(&self) -> [&'static str; 3] {
        [self.masculine, self.feminine, self.neuter]
    }
}

/// 地名形容词表（"мал." → "малый" / "малая" / "малое"）
pub struct DesignationAdjectiveTable {
    configs: Vec<DesignationAdjectiveConfig>,
    lookup: HashMap<String, usize>,
}

impl DesignationAdjectiveTable {
    pub fn new() -> Self {
        let entries: &[([&'static str; 3], &[&'static str])] = &[
            (["малый", "малая", "малое"], &["мал"]),
            (["большой", "большая", "большое"], &["бол", "больш"]),
            (["новый", "новая", "новое"], &["нов"]),
            (["старый", "старая", "старое"], &["стар"]),
            (["верхний", "верхняя", "верхнее"], &["верх", "верхн"]),
            (["нижний", "нижняя", "нижнее"], &["ниж", "нижн"]),
            (["средний", "средняя", "среднее"], &["ср", "сред", "средн"]),
            (["ближний", "ближняя", "ближнее"], &["ближн"]),
            (["дальний", "дальняя", "дальнее"], &["дальн"]),
        ];

        let mut configs = Vec::with_capacity(entries.len());
        let mut lookup = HashMap::new();
        for (index, &([masculine, feminine, neuter], aliases)) in entries.iter().enumerate() {
            let config = DesignationAdjectiveConfig {
                masculine,
                feminine,
                neuter,
            };
            for form in config.forms().into_iter().chain(aliases.iter().copied()) {
                lookup.insert(lookup_key(form), index);
            }
            configs.push(config);
        }

        Self { configs, lookup }
    }

    pub fn find(&self, word: &str) -> Option<&DesignationAdjectiveConfig> {
        self.lookup
            .get(&lookup_key(word))
            .and_then(|&index| self.configs.get(index))
    }

    /// 是否已经是完整形式（任一性别）
    pub fn is_normalized(&self, word: &str) -> bool {
        if word.ends_with('.') {
            return false;
        }
        let key = lookup_key(word);
        self.find(word)
            .is_some_and(|config| config.forms().contains(&key.as_str()))
    }
}

impl Default for DesignationAdjectiveTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 全部规则表（可复用，跨线程只读共享）
#[derive(Default)]
pub struct AddressRules {
    pub designations: DesignationTable,
    pub ordinal_number_endings: OrdinalNumberEndingTable,
    pub designation_adjectives: DesignationAdjectiveTable,
}

impl AddressRules {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designation_lookup() {
        let table = DesignationTable::new();
        let street = table.find("ул.").unwrap();
        assert_eq!(street.normalized_value, "улица");
        assert_eq!(street.designation, Designation::Street);
        assert_eq!(street.gender, Gender::Feminine);

        assert_eq!(table.find("Ул").unwrap().normalized_value, "улица");
        assert_eq!(table.find("УЛИЦА").unwrap().normalized_value, "улица");
        assert_eq!(table.find("р-н").unwrap().normalized_value, "район");
        assert_eq!(table.find("с/т").unwrap().normalized_value, "снт");
        assert_eq!(table.find("посёлок").unwrap().normalized_value, "поселок");
        assert!(table.find("Ленина").is_none());
    }

    #[test]
    fn test_designation_aliases_are_unique() {
        let table = DesignationTable::new();
        let total: usize = table.all().iter().map(|c| c.aliases.len() + 1).sum();
        assert_eq!(table.lookup.len(), total);
    }

    #[test]
    fn test_ordinal_endings() {
        let table = OrdinalNumberEndingTable::new();
        assert_eq!(table.normalize("-ый"), Some("-й"));
        assert_eq!(table.normalize("й"), Some("-й"));
        assert_eq!(table.normalize("-АЯ"), Some("-я"));
        assert_eq!(table.normalize("-е"), Some("-е"));
        assert_eq!(table.normalize("-го"), Some("-го"));
        assert_eq!(table.normalize("е"), None);
        assert_eq!(table.normalize("А"), None);
        assert_eq!(table.normalize("-летия"), None);
    }

    #[test]
    fn test_designation_adjectives() {
        let table = DesignationAdjectiveTable::new();
        let small = table.find("мал.").unwrap();
        assert_eq!(small.normalized_value(Gender::Feminine), "малая");
        assert_eq!(small.normalized_value(Gender::Masculine), "малый");
        assert_eq!(small.normalized_value(Gender::Neuter), "малое");

        assert!(table.is_normalized("Малая"));
        assert!(table.is_normalized("нижнее"));
        assert!(!table.is_normalized("мал."));
        assert!(!table.is_normalized("мал"));
        assert!(table.find("Московская").is_none());
    }
}
