use std::path::PathBuf;

pub trait IClient {
    fn fetch(&mut self) -> Result<String, Box<dyn std::error::Error>>;
}

// 決まったデータを返すクライアント
#[derive(Default)]
pub struct SampleClient;

impl IClient for SampleClient {
    // 常に成功する
    fn fetch(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let data = include_str!("example.csv");
        Ok(data.to_string())
    }
}

// ローカルの csv ファイルを読むクライアント
pub struct FileClient {
    path: PathBuf,
}

impl FileClient {
    pub fn new<T>(path: T) -> Self
    where
        T: Into<PathBuf>,
    {
        Self { path: path.into() }
    }
}

impl IClient for FileClient {
    fn fetch(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(&self.path)?;
        Ok(data)
    }
}
