// the collection of utility functions for bracket checking

/// Position (char offset) of the first bracket that has no pair, `None` if the brackets in `s`
/// are balanced. Only round brackets belong to the formula grammar.
pub fn find_unbalanced_bracket(s: &str) -> Option<usize> {
    let mut stack = Vec::new();
    for (i, c) in s.chars().enumerate() {
        match c {
            '(' => stack.push(i),
            ')' => {
                if stack.pop().is_none() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    // the innermost bracket that was left open
    stack.pop()
}

/// Char offset of `rest` inside `input`, where `rest` is a suffix of `input`.
pub fn position_of(input: &str, rest: &str) -> usize {
    let consumed = input.len().saturating_sub(rest.len());
    input[..consumed].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced() {
        assert_eq!(find_unbalanced_bracket("(x2+1)*exp(x1-2*x2)"), None);
        assert_eq!(find_unbalanced_bracket("x"), None);
        assert_eq!(find_unbalanced_bracket(""), None);
    }

    #[test]
    fn test_unbalanced_positions() {
        assert_eq!(find_unbalanced_bracket("(x+1"), Some(0));
        assert_eq!(find_unbalanced_bracket("x+1)"), Some(3));
        assert_eq!(find_unbalanced_bracket("sin((x)"), Some(3));
        assert_eq!(find_unbalanced_bracket(")("), Some(0));
    }

    #[test]
    fn test_position_of_suffix() {
        let input = "x1 + y";
        assert_eq!(position_of(input, &input[5..]), 5);
        assert_eq!(position_of(input, ""), 6);
        assert_eq!(position_of(input, input), 0);
    }
}
