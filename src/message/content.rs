use jiff::Zoned;
use jiff::civil::Date;
use unicode_normalization::UnicodeNormalization;

/// Text handed to a channel for one send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    subject: String,
    body: String,
}

impl Message {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Copy with accents decomposed and every non-ASCII character removed
    ///
    /// `"Café ☕"` becomes `"Cafe "`.
    pub fn to_ascii(&self) -> Message {
        Message {
            subject: fold_ascii(&self.subject),
            body: fold_ascii(&self.body),
        }
    }
}

fn fold_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Subject line, optionally suffixed with the local date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectLine {
    base: String,
    with_date: bool,
}

impl SubjectLine {
    pub fn new(base: impl Into<String>, with_date: bool) -> Self {
        Self {
            base: base.into(),
            with_date,
        }
    }

    pub fn render(&self, today: Date) -> String {
        if self.with_date {
            format!("{} {}", self.base, today)
        } else {
            self.base.clone()
        }
    }

    pub fn render_now(&self) -> String {
        self.render(Zoned::now().date())
    }
}
