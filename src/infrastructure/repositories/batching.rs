use once_cell::sync::Lazy;
use regex::Regex;

/// Sentence-ending punctuation; CJK full stops need no trailing space
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+|[。！？]+\s*").expect("sentence pattern is valid"));

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_chars` characters (not bytes).
pub fn split_into_batches(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut batcher = Batcher::new(max_chars);
    let mut last_end = 0;

    for mat in SENTENCE_END.find_iter(text) {
        batcher.push(&text[last_end..mat.end()]);
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        batcher.push(&text[last_end..]);
    }

    batcher.finish()
}

struct Batcher {
    max_chars: usize,
    batches: Vec<String>,
    current: String,
    current_len: usize,
}

impl Batcher {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            batches: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    fn push(&mut self, piece: &str) {
        let len = piece.chars().count();

        if !self.current.is_empty() && self.current_len + len > self.max_chars {
            self.flush();
        }

        if len > self.max_chars {
            for chunk in split_long_piece(piece, self.max_chars) {
                self.emit(chunk);
            }
        } else {
            self.current.push_str(piece);
            self.current_len += len;
        }
    }

    fn flush(&mut self) {
        let batch = std::mem::take(&mut self.current);
        self.current_len = 0;
        self.emit(batch);
    }

    fn emit(&mut self, batch: String) {
        let trimmed = batch.trim();
        if !trimmed.is_empty() {
            self.batches.push(trimmed.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.batches
    }
}

/// A sentence longer than the limit is split on whitespace; a single word
/// longer than the limit is cut by characters
fn split_long_piece(piece: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in piece.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                chunks.push(chunk.iter().collect());
            }
            continue;
        }

        let separator = usize::from(!current.is_empty());
        if current_len + separator + word_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
