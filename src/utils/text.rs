/// Split a shell line into words. Double quotes group words and are stripped.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            ch if ch.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            ch => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_honours_quotes() {
        assert_eq!(
            split_command_line("  login admin \"pass word\" "),
            vec!["login", "admin", "pass word"]
        );
        assert_eq!(split_command_line("go \"\""), vec!["go", ""]);
        assert!(split_command_line("   ").is_empty());
    }
}
