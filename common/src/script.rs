//! 繁簡変換モジュール
//!
//! 簡体字→繁体字の1文字単位の対応表から、双方向の変換表を構築する。
//! 文脈を見ない逐字変換のため、熟語単位の置き換え（例: 交互→互動）は扱わない。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 組み込みの対応表（簡体字, 繁体字）
const BUILTIN_PAIRS: &[(char, char)] = &[
    ('剧', '劇'), ('集', '集'), ('电', '電'), ('影', '影'), ('杂', '雜'), ('志', '誌'), ('时', '時'), ('间', '間'),
    ('档', '檔'), ('案', '案'), ('更', '更'), ('新', '新'), ('列', '列'), ('表', '表'), ('签', '簽'), ('标', '標'),
    ('题', '題'), ('内', '內'), ('容', '容'), ('搜', '搜'), ('寻', '尋'), ('显', '顯'), ('示', '示'), ('隐', '隱'),
    ('藏', '藏'), ('数', '數'), ('据', '據'), ('库', '庫'), ('简', '簡'), ('繁', '繁'), ('体', '體'), ('字', '字'),
    ('转', '轉'), ('换', '換'), ('优', '優'), ('化', '化'), ('验', '驗'), ('证', '證'), ('权', '權'), ('限', '限'),
    ('设', '設'), ('置', '置'), ('错', '錯'), ('误', '誤'), ('讯', '訊'), ('息', '息'), ('系', '系'), ('统', '統'),
    ('环', '環'), ('境', '境'), ('版', '版'), ('本', '本'), ('处', '處'), ('理', '理'), ('回', '回'), ('应', '應'),
    ('网', '網'), ('页', '頁'), ('浏', '瀏'), ('览', '覽'), ('器', '器'), ('缓', '緩'), ('存', '存'), ('清', '清'),
    ('除', '除'), ('模', '模'), ('块', '塊'), ('组', '組'), ('织', '織'), ('结', '結'), ('构', '構'), ('状', '狀'),
    ('态', '態'), ('负', '負'), ('载', '載'), ('压', '壓'), ('力', '力'), ('测', '測'), ('试', '試'), ('性', '性'),
    ('能', '能'), ('调', '調'), ('部', '部'), ('署', '署'), ('迭', '疊'), ('代', '代'), ('开', '開'), ('发', '發'),
    ('周', '週'), ('期', '期'), ('计', '計'), ('划', '劃'), ('实', '實'), ('现', '現'), ('功', '功'), ('需', '需'),
    ('求', '求'), ('规', '規'), ('范', '範'), ('说', '說'), ('明', '明'), ('书', '書'), ('用', '用'), ('户', '戶'),
    ('界', '界'), ('面', '面'), ('动', '動'), ('画', '畫'), ('视', '視'), ('觉', '覺'), ('元', '元'), ('素', '素'),
    ('图', '圖'), ('颜', '顏'), ('色', '色'), ('排', '排'), ('布', '佈'), ('局', '局'), ('响', '響'), ('式', '式'),
    ('适', '適'), ('配', '配'), ('不', '不'), ('同', '同'), ('备', '備'), ('屏', '屏'), ('幕', '幕'), ('尺', '尺'),
    ('寸', '寸'), ('全', '全'), ('漫', '漫'),
];

/// 簡体字→繁体字の対応表
///
/// 挿入順を保持する。同じ簡体字を再登録した場合は位置を保ったまま値を上書きする。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDictionary {
    pairs: Vec<(char, char)>,
}

impl ScriptDictionary {
    /// 組み込みの対応表
    pub fn builtin() -> Self {
        let mut dictionary = Self::default();
        for &(simplified, traditional) in BUILTIN_PAIRS {
            dictionary.insert(simplified, traditional);
        }
        dictionary
    }

    /// JSON文字列から読み込み
    ///
    /// 形式: `[["简", "簡"], ["电", "電"]]`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<(String, String)> = serde_json::from_str(json)?;
        let mut dictionary = Self::default();
        for (simplified, traditional) in &entries {
            match (single_char(simplified), single_char(traditional)) {
                (Some(s), Some(t)) => dictionary.insert(s, t),
                _ => {
                    return Err(Error::Dictionary(format!(
                        "entry must map one character to one character: {:?} -> {:?}",
                        simplified, traditional
                    )))
                }
            }
        }
        Ok(dictionary)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, simplified: char, traditional: char) {
        match self.pairs.iter_mut().find(|(s, _)| *s == simplified) {
            Some(entry) => entry.1 = traditional,
            None => self.pairs.push((simplified, traditional)),
        }
    }

    /// 対応表をマージ（後から追加した対応が優先）
    pub fn merge(&mut self, other: &ScriptDictionary) {
        for &(simplified, traditional) in &other.pairs {
            self.insert(simplified, traditional);
        }
    }

    pub fn pairs(&self) -> &[(char, char)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// 逆変換で失われる対応（複数の簡体字が同じ繁体字に対応する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub traditional: char,
    /// 対応表の順序。逆変換では最後の文字が採用される
    pub simplified: Vec<char>,
}

/// 繁簡変換器
///
/// 対応表から一度だけ構築し、参照で共有する。
#[derive(Debug, Clone)]
pub struct ScriptNormalizer {
    to_traditional: HashMap<char, char>,
    to_simplified: HashMap<char, char>,
    collisions: Vec<Collision>,
}

impl ScriptNormalizer {
    pub fn new(dictionary: &ScriptDictionary) -> Self {
        let mut to_traditional = HashMap::with_capacity(dictionary.len());
        let mut to_simplified = HashMap::with_capacity(dictionary.len());
        let mut sources: Vec<Collision> = Vec::new();

        for &(simplified, traditional) in dictionary.pairs() {
            to_traditional.insert(simplified, traditional);
            // 後勝ち
            to_simplified.insert(traditional, simplified);

            match sources.iter_mut().find(|c| c.traditional == traditional) {
                Some(c) => c.simplified.push(simplified),
                None => sources.push(Collision {
                    traditional,
                    simplified: vec![simplified],
                }),
            }
        }

        let collisions = sources.into_iter().filter(|c| c.simplified.len() > 1).collect();

        Self {
            to_traditional,
            to_simplified,
            collisions,
        }
    }

    /// 組み込みの対応表で構築
    pub fn builtin() -> Self {
        Self::new(&ScriptDictionary::builtin())
    }

    /// 繁体字へ変換（対応表にない文字はそのまま）
    pub fn to_traditional(&self, text: &str) -> String {
        text.chars()
            .map(|c| *self.to_traditional.get(&c).unwrap_or(&c))
            .collect()
    }

    /// 簡体字へ変換（対応表にない文字はそのまま）
    pub fn to_simplified(&self, text: &str) -> String {
        text.chars()
            .map(|c| *self.to_simplified.get(&c).unwrap_or(&c))
            .collect()
    }

    /// 逆変換が一意にならない繁体字の一覧
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}

impl Default for ScriptNormalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_traditional() {
        let normalizer = ScriptNormalizer::builtin();
        assert_eq!(normalizer.to_traditional("电影"), "電影");
        assert_eq!(normalizer.to_traditional("剧集 S01E02.mkv"), "劇集 S01E02.mkv");
    }

    #[test]
    fn test_to_simplified() {
        let normalizer = ScriptNormalizer::builtin();
        assert_eq!(normalizer.to_simplified("電影"), "电影");
        assert_eq!(normalizer.to_simplified("雜誌"), "杂志");
    }

    #[test]
    fn test_passes_through_unmapped() {
        let normalizer = ScriptNormalizer::builtin();
        assert_eq!(normalizer.to_traditional(""), "");
        assert_eq!(normalizer.to_traditional("abc 123\t狗"), "abc 123\t狗");
        assert_eq!(normalizer.to_simplified("ＡＢＣ　狗"), "ＡＢＣ　狗");
    }

    #[test]
    fn test_builtin_drops_multi_char_entries() {
        let normalizer = ScriptNormalizer::builtin();
        // 熟語単位の変換はしない
        assert_eq!(normalizer.to_traditional("交互"), "交互");
        assert_eq!(normalizer.to_traditional("互动"), "互動");
    }

    #[test]
    fn test_builtin_lossy_round_trip() {
        let normalizer = ScriptNormalizer::builtin();
        // 対応表どおりの（正規でない）変換をそのまま記録する
        assert_eq!(normalizer.to_traditional("迭代"), "疊代");
        assert_eq!(normalizer.to_simplified("疊"), "迭");
        assert_eq!(normalizer.to_traditional("周期"), "週期");
        assert_eq!(normalizer.to_simplified("週期"), "周期");
        assert!(normalizer.collisions().is_empty());
    }

    #[test]
    fn test_inverse_last_write_wins() {
        let dictionary = ScriptDictionary::from_json(r#"[["里", "裡"], ["裏", "裡"]]"#).unwrap();
        let normalizer = ScriptNormalizer::new(&dictionary);

        assert_eq!(normalizer.to_traditional("里裏"), "裡裡");
        assert_eq!(normalizer.to_simplified("裡"), "裏");
        assert_eq!(
            normalizer.collisions(),
            &[Collision { traditional: '裡', simplified: vec!['里', '裏'] }]
        );
    }

    #[test]
    fn test_dictionary_insert_overwrites_in_place() {
        let mut dictionary = ScriptDictionary::default();
        dictionary.insert('发', '發');
        dictionary.insert('后', '後');
        dictionary.insert('发', '髮');
        assert_eq!(dictionary.pairs(), &[('发', '髮'), ('后', '後')]);
    }

    #[test]
    fn test_dictionary_merge() {
        let mut dictionary = ScriptDictionary::builtin();
        let before = dictionary.len();
        let custom = ScriptDictionary::from_json(r#"[["连", "連"], ["载", "载"]]"#).unwrap();
        dictionary.merge(&custom);

        assert_eq!(dictionary.len(), before + 1);
        let normalizer = ScriptNormalizer::new(&dictionary);
        assert_eq!(normalizer.to_traditional("连载"), "連载");
    }

    #[test]
    fn test_dictionary_rejects_multi_char() {
        let result = ScriptDictionary::from_json(r#"[["交互", "互動"]]"#);
        assert!(matches!(result, Err(Error::Dictionary(_))));
    }
}
