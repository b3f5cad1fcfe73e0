use crate::errors::ActionError;
use crate::player::PlayerAction;

/// Parses the amount given to a raise, before it reaches the table.
///
/// `all`, `allin` and `all-in` mean shoving the whole stack; otherwise a positive whole
/// number of chips is expected.
///
/// # Examples
///
/// ```
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::rules::parse_raise_amount;
///
/// assert_eq!(parse_raise_amount("150"), Ok(PlayerAction::Raise(150)));
/// assert_eq!(parse_raise_amount("All-In"), Ok(PlayerAction::AllIn));
/// assert!(parse_raise_amount("-5").is_err());
/// ```
pub fn parse_raise_amount(raw: &str) -> Result<PlayerAction, ActionError> {
    let s = raw.trim().to_ascii_lowercase();
    if matches!(s.as_str(), "all" | "allin" | "all-in") {
        return Ok(PlayerAction::AllIn);
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ActionError::InvalidAmount(raw.trim().to_string()));
    }
    match s.parse::<u32>() {
        Ok(0) | Err(_) => Err(ActionError::InvalidAmount(raw.trim().to_string())),
        Ok(n) => Ok(PlayerAction::Raise(n)),
    }
}

/// Parses a typed command such as `fold`, `check`, `call`, `raise 50` or `allin`.
pub fn parse_action(input: &str) -> Result<PlayerAction, ActionError> {
    let mut parts = input.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = parts.collect();
    let no_args = |action: PlayerAction| {
        if rest.is_empty() {
            Ok(action)
        } else {
            Err(ActionError::UnknownAction(input.trim().to_string()))
        }
    };
    match verb.as_str() {
        "fold" | "f" => no_args(PlayerAction::Fold),
        "check" | "call" | "c" => no_args(PlayerAction::Call),
        "allin" | "all-in" | "shove" => no_args(PlayerAction::AllIn),
        "raise" | "r" | "bet" => match rest.as_slice() {
            [amount] => parse_raise_amount(amount),
            _ => Err(ActionError::InvalidAmount(rest.join(" "))),
        },
        _ => Err(ActionError::UnknownAction(input.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_amounts() {
        assert_eq!(parse_raise_amount(" 20 "), Ok(PlayerAction::Raise(20)));
        assert_eq!(parse_raise_amount("ALL"), Ok(PlayerAction::AllIn));
        assert_eq!(parse_raise_amount("allin"), Ok(PlayerAction::AllIn));
        for bad in ["", "0", "1.5", "abc", "+3", "99999999999"] {
            assert!(
                matches!(parse_raise_amount(bad), Err(ActionError::InvalidAmount(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn commands() {
        assert_eq!(parse_action("fold"), Ok(PlayerAction::Fold));
        assert_eq!(parse_action("Check"), Ok(PlayerAction::Call));
        assert_eq!(parse_action("raise 40"), Ok(PlayerAction::Raise(40)));
        assert_eq!(parse_action("raise all"), Ok(PlayerAction::AllIn));
        assert_eq!(parse_action("all-in"), Ok(PlayerAction::AllIn));
        assert!(matches!(
            parse_action("raise"),
            Err(ActionError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_action("dance"),
            Err(ActionError::UnknownAction(_))
        ));
        assert!(matches!(
            parse_action("fold now"),
            Err(ActionError::UnknownAction(_))
        ));
    }
}
