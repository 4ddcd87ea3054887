//! Wildcard title patterns.
//!
//! `?` matches exactly one character, `*` matches any run of characters
//! (including none), and everything else matches itself. Patterns are
//! anchored at both ends.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
}

/// Compiled full-string glob predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobMatcher {
    tokens: Vec<Token>,
}

impl GlobMatcher {
    /// Compile `pattern`. Consecutive `*` collapse into one.
    pub fn compile(pattern: &str) -> Self {
        let mut tokens = Vec::with_capacity(pattern.len());
        for ch in pattern.chars() {
            let token = match ch {
                '?' => Token::AnyOne,
                '*' => Token::AnyRun,
                other => Token::Literal(other),
            };
            if token == Token::AnyRun && tokens.last() == Some(&Token::AnyRun) {
                continue;
            }
            tokens.push(token);
        }
        Self { tokens }
    }

    /// True when the whole of `title` matches.
    pub fn is_match(&self, title: &str) -> bool {
        let text: Vec<char> = title.chars().collect();
        let tokens = &self.tokens;

        // Greedy scan remembering the most recent star; on mismatch, let that
        // star swallow one more character and retry from there.
        let (mut t, mut p) = (0usize, 0usize);
        let mut backtrack: Option<(usize, usize)> = None;
        while t < text.len() {
            match tokens.get(p) {
                Some(Token::AnyRun) => {
                    backtrack = Some((p, t));
                    p += 1;
                }
                Some(Token::AnyOne) => {
                    p += 1;
                    t += 1;
                }
                Some(Token::Literal(ch)) if *ch == text[t] => {
                    p += 1;
                    t += 1;
                }
                _ => {
                    let Some((star_p, star_t)) = backtrack else {
                        return false;
                    };
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
            }
        }
        tokens[p..].iter().all(|token| *token == Token::AnyRun)
    }
}
