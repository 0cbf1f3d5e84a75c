use scraper::{Html, Node};

/// Elements whose text never reaches a reader
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Splits the visible text of an HTML document into lowercase tokens
///
/// Tokens are maximal runs of alphanumeric characters, so whitespace and
/// punctuation changes never alter the token stream.
pub fn tokenize(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let mut tokens = Vec::new();

    for node in document.root_element().descendants() {
        let text = match node.value() {
            Node::Text(text) => text,
            _ => continue,
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| SKIPPED_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        push_tokens(text, &mut tokens);
    }

    tokens
}

fn push_tokens(text: &str, tokens: &mut Vec<String>) {
    tokens.extend(
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase),
    );
}
