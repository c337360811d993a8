use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static QUOTES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/quotes");

const DEFAULT_BOOK: &str = "quotes.json";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
}

impl Quote {
    /// Builds a quote with whitespace normalized, or `None` if nothing is left
    /// to type.
    pub fn new(text: &str, author: &str) -> Option<Self> {
        let text = normalize(text);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            author: author.trim().to_string(),
        })
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Where a session gets its quote from
pub trait QuoteSource {
    fn random(&self) -> Quote;
}

/// A single user-supplied quote, handed out every time
impl QuoteSource for Quote {
    fn random(&self) -> Quote {
        self.clone()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct QuoteBook {
    name: String,
    quotes: Vec<Quote>,
}

impl QuoteBook {
    /// The corpus compiled into the binary
    pub fn embedded() -> Result<Self, Box<dyn Error>> {
        read_book_from_file(DEFAULT_BOOK)
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let raw: QuoteBook = from_str(json)?;
        let quotes: Vec<Quote> = raw
            .quotes
            .iter()
            .filter_map(|q| Quote::new(&q.text, &q.author))
            .collect();
        if quotes.is_empty() {
            return Err(format!("quote book '{}' has no usable quotes", raw.name).into());
        }
        Ok(Self {
            name: raw.name,
            quotes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }
}

impl QuoteSource for QuoteBook {
    fn random(&self) -> Quote {
        // from_json guarantees at least one quote
        let idx = rand::thread_rng().gen_range(0..self.quotes.len());
        self.quotes[idx].clone()
    }
}

fn read_book_from_file(file_name: &str) -> Result<QuoteBook, Box<dyn Error>> {
    let file = QUOTES_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("quote book {file_name} not found"))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| format!("quote book {file_name} is not valid utf-8"))?;

    let book = QuoteBook::from_json(file_as_str)?;
    log::debug!("Loaded quote book '{}' with {} quotes", book.name(), book.quotes().len());
    Ok(book)
}
