// ============================================
// src/catalog.rs
// 標識アセットの列挙 (種類ごとのフォルダ構成)
// ============================================

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error::QuizError;
use crate::signs::{BUILTIN_SIGNS, BuiltinSign};

/// 種類名/標識名 → ストレージ上のキー (空白をアンダースコアに)
pub fn storage_key(name: &str) -> String {
    name.replace(' ', "_")
}

/// 標識IDから表示名を作る
/// "Warning-Curve_Ahead" -> "Curve Ahead"
pub fn display_name(id: &str) -> String {
    let start = id.find('-').map(|i| i + 1).unwrap_or(0);
    id[start..].replace('_', " ")
}

// --------------------------------------------------
// ストレージ
// --------------------------------------------------

/// アセットの読み出し元
pub trait AssetSource {
    /// カテゴリ内のエントリ名 (ファイル名) を列挙する
    fn list_entries(&self, category_key: &str) -> io::Result<Vec<String>>;

    /// エントリの中身を開く
    fn open_entry(&self, category_key: &str, entry_key: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// `<root>/<カテゴリ>/<ファイル>` 形式のディレクトリ
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirSource {
    fn list_entries(&self, category_key: &str) -> io::Result<Vec<String>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.root.join(category_key))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // ".DS_Store" などの隠しファイルは無視
            if !name.starts_with('.') {
                entries.push(name);
            }
        }
        Ok(entries)
    }

    fn open_entry(&self, category_key: &str, entry_key: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = fs::File::open(self.root.join(category_key).join(entry_key))?;
        Ok(Box::new(io::BufReader::new(file)))
    }
}

/// メモリ上のアセット (組み込みデータとテスト用)
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    categories: BTreeMap<String, Vec<(String, Vec<u8>)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みの標識リストから作る (画像データは空)
    pub fn builtin() -> Self {
        let mut source = Self::new();
        for &BuiltinSign { sign_type, file_name } in BUILTIN_SIGNS {
            source.insert(&storage_key(sign_type), file_name, Vec::new());
        }
        source
    }

    pub fn insert(&mut self, category_key: &str, entry_key: &str, bytes: Vec<u8>) {
        self.categories
            .entry(category_key.to_string())
            .or_default()
            .push((entry_key.to_string(), bytes));
    }
}

impl AssetSource for MemorySource {
    fn list_entries(&self, category_key: &str) -> io::Result<Vec<String>> {
        self.categories
            .get(category_key)
            .map(|entries| entries.iter().map(|(name, _)| name.clone()).collect())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, category_key.to_string()))
    }

    fn open_entry(&self, category_key: &str, entry_key: &str) -> io::Result<Box<dyn Read + '_>> {
        self.categories
            .get(category_key)
            .and_then(|entries| entries.iter().find(|(name, _)| name == entry_key))
            .map(|(_, bytes)| Box::new(Cursor::new(bytes.as_slice())) as Box<dyn Read + '_>)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, entry_key.to_string()))
    }
}

// --------------------------------------------------
// 標識の種類
// --------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignType {
    pub name: String,
    pub enabled: bool,
}

/// 種類名 → 有効/無効 の設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignTypes {
    types: Vec<SignType>,
}

impl SignTypes {
    /// すべて有効な状態で作る (重複した名前は1つにまとめる)
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut types: Vec<SignType> = Vec::new();
        for name in names {
            let name = name.into();
            if !types.iter().any(|t| t.name == name) {
                types.push(SignType { name, enabled: true });
            }
        }
        Self { types }
    }

    /// 有効/無効を切り替える。知らない種類なら false
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.types.iter_mut().find(|t| t.name == name) {
            Some(t) => {
                t.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(t) = self.types.get_mut(index) {
            t.enabled = !t.enabled;
        }
    }

    #[cfg(test)]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.types.iter().any(|t| t.name == name && t.enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignType> {
        self.types.iter()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.types.iter().filter(|t| t.enabled).map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

// --------------------------------------------------
// カタログ
// --------------------------------------------------

/// 1枚の標識 (種類, ID) で識別する
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignAsset {
    pub sign_type: String,
    pub id: String,        // "Warning-Curve_Ahead"
    pub file_name: String, // "Warning-Curve_Ahead.gif"
}

impl SignAsset {
    pub fn display_name(&self) -> String {
        display_name(&self.id)
    }

    pub fn category_key(&self) -> String {
        storage_key(&self.sign_type)
    }
}

/// 現在出題できる標識の一覧
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    assets: Vec<SignAsset>,
    failed: Vec<String>,
}

impl Catalog {
    /// 有効な種類の標識をすべて列挙する。
    /// 読めなかった種類はログに残してスキップ。
    pub fn rebuild(source: &dyn AssetSource, types: &SignTypes) -> Self {
        let mut catalog = Self::default();
        let mut seen = HashSet::new();

        for sign_type in types.enabled() {
            let key = storage_key(sign_type);
            let entries = match source.list_entries(&key) {
                Ok(entries) => entries,
                Err(e) => {
                    let err = QuizError::CatalogRead {
                        category: sign_type.to_string(),
                        source: e,
                    };
                    error!("Error loading image file names: {err}");
                    catalog.failed.push(sign_type.to_string());
                    continue;
                }
            };

            for file_name in entries {
                let id = Path::new(&file_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.clone());
                if !seen.insert(id.clone()) {
                    debug!("duplicate sign '{id}' in {key}, skipped");
                    continue;
                }
                catalog.assets.push(SignAsset {
                    sign_type: sign_type.to_string(),
                    id,
                    file_name,
                });
            }
        }

        info!(
            "catalog rebuilt: {} signs from {} enabled types",
            catalog.assets.len(),
            types.enabled().count()
        );
        catalog
    }

    #[cfg(test)]
    pub fn from_assets(assets: Vec<SignAsset>) -> Self {
        let mut seen = HashSet::new();
        let assets = assets
            .into_iter()
            .filter(|a| seen.insert(a.id.clone()))
            .collect();
        Self { assets, failed: Vec::new() }
    }

    pub fn assets(&self) -> &[SignAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// 読み込みに失敗した種類
    pub fn failed_types(&self) -> &[String] {
        &self.failed
    }

    /// 標識の画像データを読む。失敗はログだけ
    pub fn load_image(source: &dyn AssetSource, asset: &SignAsset) -> Option<Vec<u8>> {
        let mut bytes = Vec::new();
        let result = source
            .open_entry(&asset.category_key(), &asset.file_name)
            .and_then(|mut stream| stream.read_to_end(&mut bytes));
        match result {
            Ok(_) => Some(bytes),
            Err(e) => {
                error!("Error loading {}: {e}", asset.id);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert("A", "A-1.gif", vec![1, 2, 3]);
        source.insert("A", "A-2.gif", Vec::new());
        source.insert("B", "B-1.gif", Vec::new());
        source.insert("Work_Zone", "Work_Zone-Road_Work_Ahead.gif", Vec::new());
        source
    }

    fn ids(catalog: &Catalog) -> Vec<String> {
        let mut ids: Vec<String> = catalog.assets().iter().map(|a| a.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn display_name_strips_prefix_and_underscores() {
        assert_eq!(display_name("Warning-Curve_Ahead"), "Curve Ahead");
        assert_eq!(display_name("Work_Zone-Road_Work_Ahead"), "Road Work Ahead");
        // 最初の '-' までだけ削る
        assert_eq!(display_name("Guide-Left-Exit"), "Left-Exit");
        // '-' が無ければ全体
        assert_eq!(display_name("No_Prefix"), "No Prefix");
        assert_eq!(display_name("A-1"), display_name("A-1"));
    }

    #[test]
    fn rebuild_only_lists_enabled_types() {
        let mut types = SignTypes::new(["A", "B", "Work Zone"]);
        types.set_enabled("B", false);

        let catalog = Catalog::rebuild(&source(), &types);
        assert_eq!(ids(&catalog), ["A-1", "A-2", "Work_Zone-Road_Work_Ahead"]);
        assert!(catalog.assets().iter().all(|a| types.is_enabled(&a.sign_type)));
    }

    #[test]
    fn toggling_a_type_removes_and_restores_its_signs() {
        let source = source();
        let mut types = SignTypes::new(["A", "B"]);

        types.toggle(0);
        let without = Catalog::rebuild(&source, &types);
        assert_eq!(ids(&without), ["B-1"]);

        types.toggle(0);
        let with = Catalog::rebuild(&source, &types);
        assert_eq!(ids(&with), ["A-1", "A-2", "B-1"]);
    }

    #[test]
    fn unreadable_type_is_skipped() {
        let types = SignTypes::new(["A", "Missing", "B"]);
        let catalog = Catalog::rebuild(&source(), &types);

        assert_eq!(ids(&catalog), ["A-1", "A-2", "B-1"]);
        assert_eq!(catalog.failed_types(), ["Missing"]);
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let mut source = source();
        source.insert("A", "A-1.png", Vec::new());
        let catalog = Catalog::rebuild(&source, &SignTypes::new(["A"]));
        assert_eq!(ids(&catalog), ["A-1", "A-2"]);
    }

    #[test]
    fn sign_types_ignore_duplicate_names() {
        let types = SignTypes::new(["A", "A", "B"]);
        assert_eq!(types.len(), 2);

        let mut types = SignTypes::new(["A"]);
        assert!(!types.set_enabled("Z", false));
        assert!(types.set_enabled("A", false));
        assert_eq!(types.enabled().count(), 0);
    }

    #[test]
    fn load_image_reads_bytes_and_tolerates_missing_files() {
        let source = source();
        let catalog = Catalog::rebuild(&source, &SignTypes::new(["A"]));
        let a1 = catalog.assets().iter().find(|a| a.id == "A-1").unwrap();
        assert_eq!(Catalog::load_image(&source, a1), Some(vec![1, 2, 3]));

        let ghost = SignAsset {
            sign_type: "A".into(),
            id: "A-9".into(),
            file_name: "A-9.gif".into(),
        };
        assert_eq!(Catalog::load_image(&source, &ghost), None);
    }

    #[test]
    fn dir_source_lists_category_folders() {
        let dir = tempfile::tempdir().unwrap();
        let work_zone = dir.path().join("Work_Zone");
        fs::create_dir_all(&work_zone).unwrap();
        fs::write(work_zone.join("Work_Zone-Detour.gif"), b"GIF89a").unwrap();
        fs::write(work_zone.join(".DS_Store"), b"").unwrap();
        fs::create_dir_all(work_zone.join("nested")).unwrap();

        let source = DirSource::new(dir.path());
        let catalog = Catalog::rebuild(&source, &SignTypes::new(["Work Zone", "Guide"]));

        assert_eq!(ids(&catalog), ["Work_Zone-Detour"]);
        assert_eq!(catalog.assets()[0].display_name(), "Detour");
        assert_eq!(catalog.failed_types(), ["Guide"]);
        assert_eq!(
            Catalog::load_image(&source, &catalog.assets()[0]).as_deref(),
            Some(&b"GIF89a"[..])
        );
    }

    #[test]
    fn builtin_source_covers_every_sign_type() {
        let source = MemorySource::builtin();
        let types = SignTypes::new(crate::signs::SIGN_TYPES.iter().copied());
        let catalog = Catalog::rebuild(&source, &types);

        assert_eq!(catalog.len(), BUILTIN_SIGNS.len());
        assert!(catalog.failed_types().is_empty());
        // 表示名が重複していないこと
        let names: HashSet<String> = catalog.assets().iter().map(|a| a.display_name()).collect();
        assert_eq!(names.len(), catalog.len());
    }
}
