// Tags - レコードごとのタグ生成

use crate::core::{PipelineError, PipelineResult, TagGenerator};
use rand::Rng;

/// 小さな文字集合から固定長のタグをランダム生成する
#[derive(Debug, Clone)]
pub struct RandomTagGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl RandomTagGenerator {
    pub fn new(alphabet: &str, length: usize) -> PipelineResult<Self> {
        let alphabet: Vec<char> = alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(PipelineError::configuration(
                "タグ文字集合は空にできません",
            ));
        }
        Ok(Self { alphabet, length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl TagGenerator for RandomTagGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
            .collect()
    }
}
