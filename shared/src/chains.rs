//! Name-substring lookup for chain stores.
//!
//! The built-in lists are incomplete and biased towards Japan; callers can
//! swap in their own table through [`ChainTable::new`].

use serde::{Deserialize, Serialize};

const MAJOR_CHAINS: &[&str] = &[
    "mcdonald",
    "マクドナルド",
    "starbucks",
    "スターバックス",
    "kfc",
    "ケンタッキー",
    "burger king",
    "subway",
    "7-eleven",
    "セブン-イレブン",
    "セブンイレブン",
    "familymart",
    "ファミリーマート",
    "lawson",
    "ローソン",
    "doutor",
    "ドトール",
    "sukiya",
    "すき家",
    "yoshinoya",
    "吉野家",
    "matsuya",
    "松屋",
    "saizeriya",
    "サイゼリヤ",
    "eneos",
    "uniqlo",
    "ユニクロ",
    "daiso",
    "ダイソー",
];

const CHAINS: &[&str] = &[
    "tully's",
    "タリーズ",
    "komeda",
    "コメダ",
    "excelsior",
    "エクセルシオール",
    "mos burger",
    "モスバーガー",
    "gusto",
    "ガスト",
    "coco壱",
    "ココイチ",
    "denny's",
    "デニーズ",
    "jonathan",
    "ジョナサン",
    "royal host",
    "ロイヤルホスト",
    "ministop",
    "ミニストップ",
    "idemitsu",
    "apollostation",
    "muji",
    "無印良品",
    "matsumoto kiyoshi",
    "マツモトキヨシ",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTable {
    chains: Vec<String>,
    major_chains: Vec<String>,
}

impl ChainTable {
    pub fn new<C, M>(chains: C, major_chains: M) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            chains: chains
                .into_iter()
                .map(|entry| Into::<String>::into(entry).to_lowercase())
                .collect(),
            major_chains: major_chains
                .into_iter()
                .map(|entry| Into::<String>::into(entry).to_lowercase())
                .collect(),
        }
    }

    pub fn is_major_chain(&self, name: &str, brand: Option<&str>) -> bool {
        matches_any(&self.major_chains, name) || brand.is_some_and(|b| matches_any(&self.major_chains, b))
    }

    /// A spot counts as a chain when OSM tags a brand or operator on it, or
    /// when its name or brand matches any table entry.
    pub fn is_chain(&self, name: &str, brand: Option<&str>, operator: Option<&str>) -> bool {
        if brand.is_some_and(|b| !b.trim().is_empty()) || operator.is_some_and(|o| !o.trim().is_empty()) {
            return true;
        }
        matches_any(&self.chains, name) || self.is_major_chain(name, brand)
    }
}

impl Default for ChainTable {
    fn default() -> Self {
        Self::new(CHAINS.iter().copied(), MAJOR_CHAINS.iter().copied())
    }
}

fn matches_any(entries: &[String], value: &str) -> bool {
    let value = value.to_lowercase();
    entries.iter().any(|entry| value.contains(entry.as_str()))
}
