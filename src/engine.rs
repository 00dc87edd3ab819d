use crate::ataxx;
use crate::callbacks::Callbacks;
use crate::tc::GameClock;
use log::{error, trace};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::{
    env,
    io::{BufRead, BufReader, Error, ErrorKind, Result, Write},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

/// Capabilities every engine protocol dialect has to provide. `UaiEngine`
/// is the only dialect implemented so far.
pub trait Engine {
    fn name(&self) -> &str;
    fn newgame(&mut self) -> Result<()>;
    fn isready(&mut self) -> Result<()>;
    fn position(&mut self, pos: &ataxx::Position) -> Result<()>;
    fn set_option(&mut self, name: &str, value: &str) -> Result<()>;
    fn go(&mut self, clock: &GameClock) -> Result<String>;
    fn stop(&mut self) -> Result<()>;
    fn quit(&mut self) -> Result<()>;
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct EngineBuilder {
    pub dir: String,
    pub cmd: String,
    pub name: Option<String>,
    pub uai_options: Vec<(String, String)>,
}

impl EngineBuilder {
    pub fn init(&self, callbacks: Arc<dyn Callbacks>) -> Result<UaiEngine> {
        let working_directory = env::current_dir()?.join(&self.dir);

        let mut child = Command::new(&self.cmd)
            .current_dir(working_directory)
            .stdout(Stdio::piped())
            .stdin(Stdio::piped())
            .spawn()?;

        let stdout = BufReader::new(child.stdout.take().unwrap());
        let stdin = child.stdin.take().unwrap();

        let mut engine = UaiEngine {
            child,
            stdout,
            stdin: Some(stdin),
            name: self.name.clone().unwrap_or(self.cmd.to_string()),
            builder: self.clone(),
            callbacks,
            quit_sent: false,
        };

        engine.write_line("uai")?;

        loop {
            let input = engine.read_line()?;
            let mut it = input.split_whitespace();
            match it.next() {
                Some("uaiok") => break,
                Some("id") => {
                    if it.next() == Some("name") && self.name.is_none() {
                        let name = it.collect::<Vec<_>>().join(" ");
                        if !name.is_empty() {
                            engine.name = name;
                        }
                    }
                }
                _ => {}
            }
        }

        for (k, v) in &self.uai_options {
            engine.set_option(k, v)?;
        }

        engine.callbacks.on_engine_start(&engine.name);

        Ok(engine)
    }
}

/// A child process speaking the UAI text protocol over its standard
/// streams. Dropping the handle tears the process down on every exit
/// path, including unwinding.
pub struct UaiEngine {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stdin: Option<ChildStdin>,
    name: String,
    builder: EngineBuilder,
    callbacks: Arc<dyn Callbacks>,
    quit_sent: bool,
}

impl UaiEngine {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(Error::new(ErrorKind::BrokenPipe, "stdin closed"));
        };
        trace!("{} < {line}", self.name);
        self.callbacks.on_info_send(line);
        writeln!(stdin, "{line}")?;
        stdin.flush()
    }

    fn read_line(&mut self) -> Result<String> {
        let mut input = String::new();
        let count = self.stdout.read_line(&mut input)?;
        if count == 0 {
            error!("{} (cmd={}) disconnected", self.name, self.builder.cmd);
            Err(Error::new(ErrorKind::UnexpectedEof, "Read 0 bytes"))
        } else {
            trace!("{} > {}", self.name, input.trim());
            self.callbacks.on_info_recv(input.trim());
            Ok(input)
        }
    }
}

impl Engine for UaiEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn newgame(&mut self) -> Result<()> {
        self.write_line("uainewgame")
    }

    fn isready(&mut self) -> Result<()> {
        self.write_line("isready")?;
        loop {
            // TODO: bound the wait with movetime + 2 * timeout_buffer
            let line = self.read_line()?;
            if line.trim().eq_ignore_ascii_case("readyok") {
                return Ok(());
            }
        }
    }

    fn position(&mut self, pos: &ataxx::Position) -> Result<()> {
        self.write_line(&format!("position fen {pos}"))
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_line(&format!("setoption name {name} value {value}"))
    }

    /// Sends `go` and blocks until `bestmove`, returning the move token.
    /// Unrelated `info` lines pass through to the callbacks unparsed.
    fn go(&mut self, clock: &GameClock) -> Result<String> {
        self.write_line(&clock.go_string())?;
        loop {
            let line = self.read_line()?;
            let mut it = line.trim().split_whitespace();
            if it.next() == Some("bestmove") {
                return Ok(it.next().unwrap_or("").to_string());
            }
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.write_line("stop")
    }

    fn quit(&mut self) -> Result<()> {
        self.quit_sent = true;
        self.write_line("quit")
    }
}

impl Drop for UaiEngine {
    fn drop(&mut self) {
        if !self.quit_sent {
            let _ = self.stop();
            let _ = self.quit();
        }
        // Closing stdin tells a well-behaved engine to exit.
        drop(self.stdin.take());

        for _ in 0..50 {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(_) => break,
            }
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
