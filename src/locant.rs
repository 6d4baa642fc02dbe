//! Parsing and printing of fused ring locants such as `4a` or `10b`.

use nom::{
    character::complete::{digit1, satisfy},
    combinator::{all_consuming, map_res, opt},
    sequence::pair,
    IResult,
};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A fused ring locant: a position number, plus a letter for fusion atoms
/// that follow that position on the periphery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locant {
    pub number: u32,
    pub letter: Option<char>,
}

impl Locant {
    pub fn numeric(number: u32) -> Self {
        Self {
            number,
            letter: None,
        }
    }

    pub fn lettered(number: u32, letter: char) -> Self {
        Self {
            number,
            letter: Some(letter),
        }
    }

    /// Is this the locant of a fusion atom (`4a`) rather than a plain position (`4`)?
    pub fn is_lettered(&self) -> bool {
        self.letter.is_some()
    }
}

fn parse_number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

fn parse_locant(input: &str) -> IResult<&str, Locant> {
    let (rest, (number, letter)) =
        pair(parse_number, opt(satisfy(|c| c.is_ascii_lowercase())))(input)?;
    Ok((rest, Locant { number, letter }))
}

impl FromStr for Locant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(parse_locant)(s.trim())
            .map(|(_, locant)| locant)
            .map_err(|e| format!("Invalid locant '{}': {}", s, e))
    }
}

impl Display for Locant {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.letter {
            Some(letter) => write!(f, "{}{}", self.number, letter),
            None => write!(f, "{}", self.number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locants() {
        assert_eq!("4".parse::<Locant>(), Ok(Locant::numeric(4)));
        assert_eq!("4a".parse::<Locant>(), Ok(Locant::lettered(4, 'a')));
        assert_eq!("10b".parse::<Locant>(), Ok(Locant::lettered(10, 'b')));
        assert_eq!("10b".parse::<Locant>().unwrap().to_string(), "10b");
    }

    #[test]
    fn test_reject_malformed() {
        assert!("a4".parse::<Locant>().is_err());
        assert!("4ab".parse::<Locant>().is_err());
        assert!("4A".parse::<Locant>().is_err());
        assert!("".parse::<Locant>().is_err());
    }

    #[test]
    fn test_ordering() {
        let mut locants: Vec<Locant> = ["5", "4a", "4", "10", "4b"]
            .iter()
            .map(|l| l.parse().unwrap())
            .collect();
        locants.sort();
        let printed: Vec<String> = locants.iter().map(|l| l.to_string()).collect();
        assert_eq!(printed, vec!["4", "4a", "4b", "5", "10"]);
    }
}
