// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Text instance loader.
//!
//! Instances are whitespace-delimited token streams. A `#` starts a comment
//! that runs to the end of the line. The token order is:
//!
//! ```raw
//! N K                       number of tasks, number of cranes
//! p_1 ... p_N               task durations (strictly positive)
//! l_1 ... l_N               task bay locations
//! c_1 ... c_K               crane start bays
//! S                         number of non-simultaneity pairs
//! i j   (S times)           unordered pair
//! P                         number of precedence pairs
//! i j   (P times)           i before j
//! ```
//!
//! Task ids in pairs are 0-based unless the loader is configured with
//! `one_based_task_ids(true)`. Pair lists are validated against `N`, and
//! self-pairs are rejected, so a successfully loaded `Problem` satisfies
//! every `ProblemBuilder` precondition.

use crate::{
    index::{CraneIndex, TaskIndex},
    problem::{Problem, ProblemBuilder},
};
use qcs_core::num::SolverNumeric;
use std::{
    collections::VecDeque,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the problem loading process.
#[derive(Debug)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all tokens were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// `N` or `K` is not a positive integer.
    InvalidDimensions,
    /// A task duration is zero or negative.
    NonPositiveDuration(TaskIndex),
    /// A pair references a task id outside `[0, N)` after base adjustment.
    TaskOutOfRange { task_id: i64, num_tasks: usize },
    /// A pair references the same task twice.
    SelfReferentialPair(TaskIndex),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The token that failed to parse.
    pub token: String,
    /// The type we tried to parse into.
    pub type_name: &'static str,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for ProblemLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::InvalidDimensions => {
                write!(f, "Problem dimensions (N and K) must be positive integers")
            }
            Self::NonPositiveDuration(task) => {
                write!(f, "Task {} has a non-positive duration", task.get())
            }
            Self::TaskOutOfRange { task_id, num_tasks } => write!(
                f,
                "Task id {task_id} is out of range for an instance with {num_tasks} tasks"
            ),
            Self::SelfReferentialPair(task) => {
                write!(f, "Task {} is paired with itself", task.get())
            }
        }
    }
}

impl std::error::Error for ProblemLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProblemLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for ProblemLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

/// A configurable loader for quay crane scheduling instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader<T> {
    one_based_task_ids: bool,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Default for ProblemLoader<T> {
    fn default() -> Self {
        Self {
            one_based_task_ids: false,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> ProblemLoader<T>
where
    T: SolverNumeric + FromStr,
{
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interprets task ids in pair lists as 1-based.
    #[inline]
    pub fn one_based_task_ids(mut self, yes: bool) -> Self {
        self.one_based_task_ids = yes;
        self
    }

    /// Loads a problem from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Problem<T>, ProblemLoaderError> {
        let mut sc = Scanner::new(rdr);

        let n: i64 = sc.next()?;
        let k: i64 = sc.next()?;
        if n <= 0 || k <= 0 {
            return Err(ProblemLoaderError::InvalidDimensions);
        }
        let num_tasks = usize::try_from(n).map_err(|_| ProblemLoaderError::InvalidDimensions)?;
        let num_cranes = usize::try_from(k).map_err(|_| ProblemLoaderError::InvalidDimensions)?;

        let mut builder = ProblemBuilder::<T>::new(num_tasks, num_cranes);

        for task in TaskIndex::range(num_tasks) {
            let duration: T = sc.next()?;
            if !duration.is_positive() {
                return Err(ProblemLoaderError::NonPositiveDuration(task));
            }
            builder.set_task_duration(task, duration);
        }

        for task in TaskIndex::range(num_tasks) {
            let location: i64 = sc.next()?;
            builder.set_task_location(task, location);
        }

        for crane in CraneIndex::range(num_cranes) {
            let location: i64 = sc.next()?;
            builder.set_crane_location(crane, location);
        }

        let num_non_simultaneous: usize = sc.next()?;
        for _ in 0..num_non_simultaneous {
            let (a, b) = self.read_pair(&mut sc, num_tasks)?;
            builder.add_non_simultaneous(a, b);
        }

        let num_precedences: usize = sc.next()?;
        for _ in 0..num_precedences {
            let (before, after) = self.read_pair(&mut sc, num_tasks)?;
            builder.add_precedence(before, after);
        }

        Ok(builder.build())
    }

    /// Loads a problem from a file path.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Problem<T>, ProblemLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem from any reader.
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<Problem<T>, ProblemLoaderError> {
        self.from_bufread(BufReader::new(reader))
    }

    /// Loads a problem from a string slice.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(&self, s: &str) -> Result<Problem<T>, ProblemLoaderError> {
        self.from_bufread(s.as_bytes())
    }

    fn read_pair<R: BufRead>(
        &self,
        sc: &mut Scanner<R>,
        num_tasks: usize,
    ) -> Result<(TaskIndex, TaskIndex), ProblemLoaderError> {
        let a = self.read_task_id(sc, num_tasks)?;
        let b = self.read_task_id(sc, num_tasks)?;
        if a == b {
            return Err(ProblemLoaderError::SelfReferentialPair(a));
        }
        Ok((a, b))
    }

    fn read_task_id<R: BufRead>(
        &self,
        sc: &mut Scanner<R>,
        num_tasks: usize,
    ) -> Result<TaskIndex, ProblemLoaderError> {
        let raw: i64 = sc.next()?;
        let shifted = if self.one_based_task_ids {
            raw.checked_sub(1)
        } else {
            Some(raw)
        };
        match shifted.map(usize::try_from) {
            Some(Ok(index)) if index < num_tasks => Ok(TaskIndex::new(index)),
            _ => Err(ProblemLoaderError::TaskOutOfRange {
                task_id: raw,
                num_tasks,
            }),
        }
    }
}

/// Pulls whitespace-separated tokens out of a line-oriented reader.
struct Scanner<R> {
    rdr: R,
    line: String,
    tokens: VecDeque<String>,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            line: String::new(),
            tokens: VecDeque::new(),
        }
    }

    /// Reads the next token and parses it into `V`.
    fn next<V>(&mut self) -> Result<V, ProblemLoaderError>
    where
        V: FromStr,
    {
        while self.tokens.is_empty() {
            self.line.clear();
            if self.rdr.read_line(&mut self.line)? == 0 {
                return Err(ProblemLoaderError::UnexpectedEof);
            }
            let content = match self.line.find('#') {
                Some(pos) => &self.line[..pos],
                None => self.line.as_str(),
            };
            self.tokens
                .extend(content.split_whitespace().map(str::to_owned));
        }

        let token = self.tokens.pop_front().ok_or(ProblemLoaderError::UnexpectedEof)?;
        token.parse::<V>().map_err(|_| {
            ProblemLoaderError::Parse(ParseTokenError {
                token,
                type_name: std::any::type_name::<V>(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
# five tasks, two cranes
5 2
8 10 20 5 30      # durations
1 2 3 5 6         # bays
1 4               # crane start bays
4
0 1
1 2
2 3
3 4
0
";

    #[test]
    fn test_load_scenario() {
        let problem = ProblemLoader::<i64>::new()
            .from_str(SCENARIO)
            .expect("scenario should load");

        assert_eq!(problem.num_tasks(), 5);
        assert_eq!(problem.num_cranes(), 2);
        assert_eq!(problem.durations(), &[8, 10, 20, 5, 30]);
        assert_eq!(problem.task_locations(), &[1, 2, 3, 5, 6]);
        assert_eq!(problem.crane_locations(), &[1, 4]);
        assert_eq!(problem.non_simultaneous_pairs().len(), 4);
        assert!(problem.precedence_pairs().is_empty());
        assert_eq!(problem.ship_bay_span(), 5);
    }

    #[test]
    fn test_one_based_ids_are_shifted() {
        let input = "2 1\n3 4\n0 1\n0\n1\n1 2\n1\n2 1\n";
        let problem = ProblemLoader::<i64>::new()
            .one_based_task_ids(true)
            .from_str(input)
            .expect("one-based instance should load");

        assert!(problem.are_non_simultaneous(TaskIndex::new(0), TaskIndex::new(1)));
        assert_eq!(
            problem.precedence_pairs(),
            &[(TaskIndex::new(1), TaskIndex::new(0))]
        );
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        let err = ProblemLoader::<i64>::new().from_str("0 2\n").unwrap_err();
        assert!(matches!(err, ProblemLoaderError::InvalidDimensions));
    }

    #[test]
    fn test_truncated_input_is_eof() {
        let err = ProblemLoader::<i64>::new()
            .from_str("2 1\n3\n")
            .unwrap_err();
        assert!(matches!(err, ProblemLoaderError::UnexpectedEof));
    }

    #[test]
    fn test_garbage_token_is_parse_error() {
        let err = ProblemLoader::<i64>::new()
            .from_str("2 1\n3 x\n")
            .unwrap_err();
        match err {
            ProblemLoaderError::Parse(e) => assert_eq!(e.token, "x"),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_non_positive_duration_is_rejected() {
        let err = ProblemLoader::<i64>::new()
            .from_str("2 1\n3 0\n0 1\n0\n0\n0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ProblemLoaderError::NonPositiveDuration(t) if t.get() == 1
        ));
    }

    #[test]
    fn test_out_of_range_pair_is_rejected() {
        let err = ProblemLoader::<i64>::new()
            .from_str("2 1\n3 4\n0 1\n0\n1\n0 2\n0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ProblemLoaderError::TaskOutOfRange {
                task_id: 2,
                num_tasks: 2
            }
        ));
    }

    #[test]
    fn test_one_based_minimum_id_is_out_of_range() {
        let input = format!("2 1\n3 4\n0 1\n0\n1\n{} 2\n0\n", i64::MIN);
        let err = ProblemLoader::<i64>::new()
            .one_based_task_ids(true)
            .from_str(&input)
            .unwrap_err();
        assert!(matches!(
            err,
            ProblemLoaderError::TaskOutOfRange {
                task_id: i64::MIN,
                num_tasks: 2
            }
        ));

        let err = ProblemLoader::<i64>::new()
            .one_based_task_ids(true)
            .from_str("2 1\n3 4\n0 1\n0\n1\n0 1\n0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ProblemLoaderError::TaskOutOfRange {
                task_id: 0,
                num_tasks: 2
            }
        ));
    }

    #[test]
    fn test_self_pair_is_rejected() {
        let err = ProblemLoader::<i64>::new()
            .from_str("2 1\n3 4\n0 1\n0\n0\n1\n1 1\n")
            .unwrap_err();
        assert!(matches!(err, ProblemLoaderError::SelfReferentialPair(t) if t.get() == 1));
    }
}
