//! Condition evaluated by an external `awk` process
//!
//! For conditions that need more of awk than the in-process evaluator offers.
//! Each evaluation is one blocking subprocess, bounded by a timeout after
//! which the child is killed.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::Predicate;
use crate::error::{BlockSearchError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone)]
pub struct ExternalAwkPredicate {
    condition: String,
    awk: String,
    program: String,
    timeout: Duration,
}

impl ExternalAwkPredicate {
    /// Build the predicate and check the program compiles by running it once
    /// on empty input.
    pub fn new(condition: &str, awk: &str, timeout: Duration) -> Result<Self> {
        let condition = if condition.trim().is_empty() {
            "1".to_string()
        } else {
            condition.to_string()
        };

        let program = format!(
            "{{ _block = (NR == 1) ? $0 : _block \"\\n\" $0 }}\n\
             END {{ $0 = _block; if ({}) print \"TRUE\"; else print \"FALSE\" }}",
            condition
        );

        let predicate = Self {
            condition,
            awk: awk.to_string(),
            program,
            timeout,
        };

        let output = predicate.run("")?;
        if !output.success {
            return Err(BlockSearchError::InvalidExpression {
                expression: predicate.condition.clone(),
                position: 0,
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(predicate)
    }

    fn run(&self, input: &str) -> Result<AwkOutput> {
        let mut child = Command::new(&self.awk)
            .arg(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BlockSearchError::Config(format!("failed to run '{}': {}", self.awk, e)))?;

        let stdin = child.stdin.take();
        let input = input.to_string();
        let writer = thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                // awk may exit before reading everything; a broken pipe is fine
                let _ = stdin.write_all(input.as_bytes());
            }
        });

        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let timed_out = || BlockSearchError::Timeout(self.timeout.as_millis() as u64);

        // processes started by the condition (`system()`) can outlive awk and
        // keep the pipes open, so the readers are only waited on until the
        // deadline and otherwise left detached
        let status = wait_with_deadline(&mut child, deadline)?.ok_or_else(timed_out)?;
        drop(writer);

        Ok(AwkOutput {
            success: status.success(),
            stdout: receive_until(&stdout, deadline).ok_or_else(timed_out)?,
            stderr: receive_until(&stderr, deadline).ok_or_else(timed_out)?,
        })
    }
}

struct AwkOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buffer);
        }
        let _ = sender.send(buffer);
    });
    receiver
}

fn receive_until(receiver: &Receiver<String>, deadline: Instant) -> Option<String> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match receiver.recv_timeout(remaining) {
        Ok(buffer) => Some(buffer),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

/// Wait for the child, killing it at `deadline`. `None` means killed.
fn wait_with_deadline(child: &mut Child, deadline: Instant) -> Result<Option<std::process::ExitStatus>> {
    let to_error = |e: std::io::Error| BlockSearchError::Evaluation(format!("waiting for awk: {}", e));

    loop {
        if let Some(status) = child.try_wait().map_err(to_error)? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            debug!("awk ran past its deadline, killing");
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

impl Predicate for ExternalAwkPredicate {
    fn describe(&self) -> String {
        self.condition.clone()
    }

    fn evaluate(&self, block_text: &str) -> Result<bool> {
        let output = self.run(block_text)?;
        if !output.success {
            return Err(BlockSearchError::Evaluation(output.stderr.trim().to_string()));
        }

        match output.stdout.trim() {
            "TRUE" => Ok(true),
            "FALSE" => Ok(false),
            other => Err(BlockSearchError::Evaluation(format!(
                "unexpected awk result: {}",
                other
            ))),
        }
    }
}
