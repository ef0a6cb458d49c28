use raffle_core::{CoreError, RaffleRequest};
use std::io::{self, BufRead, Write};

/// Operator answers supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub thread_url: Option<String>,
    pub keyword: Option<String>,
    pub winner_count: Option<String>,
    pub min_posts: Option<String>,
    pub exclusions: Option<String>,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{} ", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Blocks until the operator presses Enter.
    pub fn confirm(&mut self, message: &str) -> io::Result<()> {
        self.ask(message).map(|_| ())
    }

    fn answer_or_ask(&mut self, preset: Option<String>, message: &str) -> io::Result<String> {
        match preset {
            Some(answer) => Ok(answer),
            None => self.ask(message),
        }
    }

    /// Asks for every answer not already given and validates the result.
    pub fn gather_request(&mut self, answers: Answers) -> Result<RaffleRequest, CoreError> {
        let thread_url = self.answer_or_ask(answers.thread_url, "📎 Thread URL:")?;
        let keyword = self.answer_or_ask(answers.keyword, "🔍 Keyword to filter by (e.g. 참여):")?;
        let winner_count = self.answer_or_ask(answers.winner_count, "🎁 Number of winners:")?;
        let min_posts = self.answer_or_ask(answers.min_posts, "📝 Minimum number of posts:")?;
        let exclusions = self.answer_or_ask(
            answers.exclusions,
            "🚫 Names to exclude, separated by commas (e.g. 홍길동,철수):",
        )?;

        Ok(RaffleRequest::from_answers(
            &thread_url,
            &keyword,
            &winner_count,
            &min_posts,
            &exclusions,
        )?)
    }
}
