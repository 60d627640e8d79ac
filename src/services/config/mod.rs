// 設定管理機能
// パイプラインのワーカー数、バッファ容量、タグ生成パラメータ

pub mod implementations;

// 公開API
pub use implementations::DefaultPipelineConfig;
