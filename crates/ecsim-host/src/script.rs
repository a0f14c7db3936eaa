//! Port transaction scripts
//!
//! One transaction per line:
//!
//! ```text
//! # get project
//! w 0x66 0x92
//! r 0x62 = 'N'
//! r 0x62
//! ```
//!
//! `r PORT [= VALUE]` reads a port, optionally checking the result;
//! `w PORT VALUE` writes one. Numbers are hex (`0x..`), decimal, or a
//! quoted ASCII character. `#` starts a comment.

use ecsim_core::Ec;

use crate::error::{HostError, Result};

/// One scripted port access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Read a port, optionally checking the value
    Read {
        /// I/O port
        port: u8,
        /// Expected value
        expect: Option<u8>,
    },
    /// Write a port
    Write {
        /// I/O port
        port: u8,
        /// Value written
        value: u8,
    },
}

/// A parsed script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// 1-based source line
    pub line: usize,
    /// The access
    pub op: Op,
}

/// Result of running one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    /// The step that ran
    pub step: Step,
    /// Value read, for reads
    pub value: Option<u8>,
}

/// Parse a byte: hex (0x..), decimal, or 'c'
fn parse_u8(s: &str) -> std::result::Result<u8, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value {}: {}", s, e))
    } else if let Some(c) = s.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')) {
        match c.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("Invalid character literal {}", s)),
        }
    } else {
        s.parse::<u8>()
            .map_err(|e| format!("Invalid number {}: {}", s, e))
    }
}

fn parse_line(line: &str) -> std::result::Result<Option<Op>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["r" | "read", port] => Ok(Some(Op::Read {
            port: parse_u8(port)?,
            expect: None,
        })),
        ["r" | "read", port, "=", value] => Ok(Some(Op::Read {
            port: parse_u8(port)?,
            expect: Some(parse_u8(value)?),
        })),
        ["w" | "write", port, value] => Ok(Some(Op::Write {
            port: parse_u8(port)?,
            value: parse_u8(value)?,
        })),
        _ => Err(format!("Unrecognized transaction: {}", line)),
    }
}

/// A parsed transaction script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Parse script text
    pub fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let op = parse_line(line).map_err(|message| HostError::Script {
                line: i + 1,
                message,
            })?;
            if let Some(op) = op {
                steps.push(Step { line: i + 1, op });
            }
        }
        Ok(Self { steps })
    }

    /// Parsed steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step against `ec`, stopping at the first failed expectation
    pub fn run(&self, ec: &mut Ec) -> Result<Vec<Transaction>> {
        let mut transactions = Vec::with_capacity(self.steps.len());
        for &step in &self.steps {
            let value = match step.op {
                Op::Read { port, expect } => {
                    let actual = ec.read(port);
                    if let Some(expected) = expect {
                        if actual != expected {
                            return Err(HostError::Mismatch {
                                line: step.line,
                                port,
                                expected,
                                actual,
                            });
                        }
                    }
                    Some(actual)
                }
                Op::Write { port, value } => {
                    ec.write(port, value);
                    None
                }
            };
            transactions.push(Transaction { step, value });
        }
        Ok(transactions)
    }
}
