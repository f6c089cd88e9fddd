use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_until, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{eof, map, map_res, opt},
    sequence::{preceded, tuple},
    IResult,
};

#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    List,
    Get { id: u64 },
    Category { name: String },
    Recognize { path: String },
    Results,
    Result { id: u64 },
    Health,
    Help,
    Exit,
}

// --- BASIC PARSERS ---

fn parse_u64(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse::<u64>())(input)
}

fn parse_quoted_string(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let (input, content) = take_until("\"")(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, content.to_string()))
}

/// A quoted string, or everything up to the end of the line.
fn parse_text(input: &str) -> IResult<&str, String> {
    alt((
        parse_quoted_string,
        map(take_while1(|_| true), |s: &str| s.trim().to_string()),
    ))(input)
}

// --- HELPERS ---
fn tag_ci(t: &'static str) -> impl FnMut(&str) -> IResult<&str, &str> {
    move |input| tag_no_case(t)(input)
}

// --- COMMAND PARSERS ---

fn parse_list(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("LIST")(input)?;
    let (input, _) = opt(preceded(multispace1, tag_ci("MONUMENTS")))(input)?;
    Ok((input, Command::List))
}

fn parse_get(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("GET")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, id) = parse_u64(input)?;
    Ok((input, Command::Get { id }))
}

fn parse_category(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("CATEGORY")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, name) = parse_text(input)?;
    Ok((input, Command::Category { name }))
}

fn parse_recognize(input: &str) -> IResult<&str, Command> {
    let (input, _) = alt((tag_ci("RECOGNIZE"), tag_ci("UPLOAD")))(input)?;
    let (input, _) = multispace1(input)?;
    let (input, path) = parse_text(input)?;
    Ok((input, Command::Recognize { path }))
}

fn parse_results(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("RESULTS")(input)?;
    let (input, _) = multispace0(input)?;
    // RESULTS takes no arguments
    let (input, _) = eof(input)?;
    Ok((input, Command::Results))
}

fn parse_result(input: &str) -> IResult<&str, Command> {
    let (input, _) = tuple((tag_ci("RESULT"), multispace1))(input)?;
    let (input, id) = parse_u64(input)?;
    Ok((input, Command::Result { id }))
}

fn parse_health(input: &str) -> IResult<&str, Command> {
    let (input, _) = alt((tag_ci("HEALTH"), tag_ci("PING")))(input)?;
    Ok((input, Command::Health))
}

fn parse_help(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_ci("HELP")(input)?;
    Ok((input, Command::Help))
}

fn parse_exit(input: &str) -> IResult<&str, Command> {
    let (input, _) = alt((tag_ci("EXIT"), tag_ci("QUIT")))(input)?;
    Ok((input, Command::Exit))
}

pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    let result = alt((
        parse_list,
        parse_get,
        parse_category,
        parse_recognize,
        parse_results,
        parse_result,
        parse_health,
        parse_help,
        parse_exit,
    ))(input);

    match result {
        Ok((remainder, cmd)) => {
            let remainder = remainder.trim();
            if !remainder.is_empty() {
                return Err(format!("Unexpected tokens at end: '{}'", remainder));
            }
            Ok(cmd)
        },
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let context: String = e.input.chars().take(20).collect();
            let context = if e.input.chars().count() > 20 {
                format!("{}...", context)
            } else {
                context
            };
            Err(format!("Invalid syntax near: '{}'", context))
        },
        Err(nom::Err::Incomplete(_)) => Err("Incomplete command.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("LIST", Command::List)]
    #[case("list monuments", Command::List)]
    #[case("GET 3", Command::Get { id: 3 })]
    #[case("  get   42  ", Command::Get { id: 42 })]
    #[case("CATEGORY \"Roman Era\"", Command::Category { name: "Roman Era".into() })]
    #[case("category Islamic Architecture", Command::Category { name: "Islamic Architecture".into() })]
    #[case("CATEGORY \"All Monuments\"", Command::Category { name: "All Monuments".into() })]
    #[case("RECOGNIZE \"/tmp/my photo.jpg\"", Command::Recognize { path: "/tmp/my photo.jpg".into() })]
    #[case("upload ./el_djem.png", Command::Recognize { path: "./el_djem.png".into() })]
    #[case("RESULTS", Command::Results)]
    #[case("result 7", Command::Result { id: 7 })]
    #[case("HEALTH", Command::Health)]
    #[case("ping", Command::Health)]
    #[case("help", Command::Help)]
    #[case("QUIT", Command::Exit)]
    fn commands_parse(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(parse_command(input), Ok(expected));
    }

    #[rstest]
    #[case("GET abc")]
    #[case("GET")]
    #[case("RESULT")]
    #[case("RESULTS 4")]
    #[case("LIST everything")]
    #[case("DELETE 1")]
    #[case("")]
    fn malformed_commands_are_rejected(#[case] input: &str) {
        assert!(parse_command(input).is_err(), "{input:?} should not parse");
    }

    #[test]
    fn trailing_tokens_are_reported() {
        let err = parse_command("HEALTH now").expect_err("trailing tokens");
        assert!(err.contains("now"), "unexpected message: {err}");
    }
}
