use std::sync::Arc;
use std::time::Duration;

use crate::adjudicate::{AdjudicationSettings, MaterialSettings};
use crate::callbacks::Callbacks;
use crate::engine;
use crate::engine::Engine;
use crate::tc;

#[derive(Debug, Clone)]
pub struct MetaDataOptions {
    pub event_name: String,
    pub site_name: String,
}

#[derive(Debug, Clone)]
pub struct BookOptions {
    pub file: String,
    pub random_order: bool,
    pub start_index: usize,
}

impl Default for BookOptions {
    fn default() -> Self {
        BookOptions {
            file: String::from("<none>"),
            random_order: false,
            start_index: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgnOutOptions {
    pub file: String,
    pub verbose: bool,
}

impl Default for PgnOutOptions {
    fn default() -> Self {
        PgnOutOptions {
            file: String::default(),
            verbose: false,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct EngineOptions {
    pub builder: engine::EngineBuilder,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub engines: Vec<EngineOptions>,
    pub book: Option<BookOptions>,
    pub games: u64,
    pub repeat: bool,
    pub tc: tc::SearchSettings,
    pub concurrency: u64,
    pub rand_seed: Option<u64>,
    pub meta: MetaDataOptions,
    pub pgn: Option<PgnOutOptions>,
    pub adjudication: AdjudicationSettings,
    pub report_interval: Option<u64>,
}

impl CliOptions {
    /// Starts every engine once to resolve its reported name. Doubles as
    /// the startup check that each engine binary actually runs.
    pub fn engine_names(&self, callbacks: &Arc<dyn Callbacks>) -> std::io::Result<Vec<String>> {
        self.engines
            .iter()
            .map(|e| Ok(e.builder.init(callbacks.clone())?.name().to_string()))
            .collect()
    }
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            engines: vec![],
            book: None,
            games: 1,
            repeat: true,
            tc: tc::SearchSettings::default(),
            concurrency: 1,
            rand_seed: None,
            meta: MetaDataOptions {
                event_name: String::from("?"),
                site_name: String::from("?"),
            },
            pgn: None,
            adjudication: AdjudicationSettings::default(),
            report_interval: Some(10),
        }
    }
}

fn parse_engine_option(engine: &mut EngineOptions, name: &str, value: &str) {
    match name {
        "name" => {
            engine.builder.name = Some(String::from(value));
        }
        "dir" => {
            engine.builder.dir = String::from(value);
        }
        "cmd" => {
            engine.builder.cmd = String::from(value);
        }
        name => {
            if let Some(optionname) = name.strip_prefix("option.") {
                engine
                    .builder
                    .uai_options
                    .push((optionname.to_string(), value.to_string()));
            } else {
                eprintln!("Unknown engine option {name}={value}");
            }
        }
    }
}

pub fn parse() -> Option<CliOptions> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

pub fn parse_args(args: &[String]) -> Option<CliOptions> {
    let mut options = CliOptions::default();
    let mut each_options = Vec::<(String, String)>::new();

    let mut it = args.iter().peekable();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "-version" | "--version" => {
                println!("Ataxxtest version {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }

            "-event" => {
                let Some(value) = it.next() else { break };
                options.meta.event_name = value.to_string();
            }

            "-site" => {
                let Some(value) = it.next() else { break };
                options.meta.site_name = value.to_string();
            }

            "-engine" => {
                let mut engine = EngineOptions::default();
                while let Some(option) = it.peek()
                    && !option.starts_with("-")
                    && let Some((name, value)) = option.split_once('=')
                {
                    it.next(); // consume token

                    parse_engine_option(&mut engine, name, value);
                }
                if engine.builder.cmd.is_empty() {
                    eprintln!("cmd required for -engine");
                    return None;
                }
                options.engines.push(engine);
            }

            "-each" => {
                while let Some(option) = it.peek()
                    && !option.starts_with("-")
                    && let Some((name, value)) = option.split_once('=')
                {
                    it.next(); // consume token

                    each_options.push((name.to_string(), value.to_string()));
                }
            }

            "-openings" => {
                if options.book.is_some() {
                    eprintln!("Duplicate -openings flag");
                    return None;
                }

                let mut book = BookOptions::default();
                while let Some(option) = it.peek()
                    && !option.starts_with("-")
                    && let Some((name, value)) = option.split_once('=')
                {
                    it.next(); // consume token

                    match name {
                        "file" => {
                            book.file = String::from(value);
                        }
                        "order" => {
                            book.random_order = value == "random";
                        }
                        "start" => {
                            if let Ok(value) = value.parse::<usize>() {
                                if value == 0 {
                                    eprintln!(
                                        "invalid opening start index {value} (must be bigger than zero)"
                                    );
                                    return None;
                                }
                                book.start_index = value;
                            } else {
                                eprintln!(
                                    "invalid opening start index {value} (must be unsigned integer)"
                                );
                                return None;
                            }
                        }
                        _ => {
                            eprintln!("Invalid key {name} for -openings");
                            return None;
                        }
                    }
                }
                options.book = Some(book);
            }

            "-tc" => {
                let Some(value) = it.next() else { break };
                match tc::SearchSettings::parse(value) {
                    Some(tc) => options.tc = tc,
                    None => {
                        eprintln!("Invalid time control specification {value}");
                        return None;
                    }
                }
            }

            "-st" => {
                let Some(value) = it.next() else { break };
                match value.parse::<u64>() {
                    Ok(value) => {
                        options.tc = tc::SearchSettings::Movetime(Duration::from_millis(value));
                    }
                    Err(_) => {
                        eprintln!("Expected milliseconds for -st option");
                        return None;
                    }
                }
            }

            "-depth" => {
                let Some(value) = it.next() else { break };
                match value.parse::<u32>() {
                    Ok(value) => options.tc = tc::SearchSettings::Depth(value),
                    Err(_) => {
                        eprintln!("Expected number for -depth option");
                        return None;
                    }
                }
            }

            "-nodes" => {
                let Some(value) = it.next() else { break };
                match value.parse::<u64>() {
                    Ok(value) => options.tc = tc::SearchSettings::Nodes(value),
                    Err(_) => {
                        eprintln!("Expected number for -nodes option");
                        return None;
                    }
                }
            }

            "-concurrency" => {
                let Some(option) = it.next() else { break };
                if let Ok(option) = option.parse::<u64>() {
                    if option == 0 {
                        eprintln!("invalid concurrency value {option} (must be bigger than zero)");
                        return None;
                    }
                    options.concurrency = option;
                } else {
                    eprintln!("invalid concurrency value {option} (must be unsigned integer)");
                    return None;
                }
            }

            "-srand" => {
                let Some(option) = it.next() else { break };
                if let Ok(option) = option.parse::<u64>() {
                    options.rand_seed = Some(option);
                } else {
                    eprintln!("invalid random seed {option} (must be unsigned integer)");
                    return None;
                }
            }

            "-games" => {
                let Some(option) = it.next() else { break };
                if let Ok(option) = option.parse::<u64>() {
                    if option == 0 {
                        eprintln!("invalid games value {option} (must be bigger than zero)");
                        return None;
                    }
                    options.games = option;
                } else {
                    eprintln!("invalid games value {option} (must be unsigned integer)");
                    return None;
                }
            }

            "-repeat" => {
                options.repeat = true;
            }

            "-norepeat" => {
                options.repeat = false;
            }

            "-pgnout" => {
                let mut pgn_out = PgnOutOptions::default();
                while let Some(option) = it.peek()
                    && !option.starts_with("-")
                    && let Some((name, value)) = option.split_once('=')
                {
                    it.next(); // consume token

                    match name {
                        "file" => {
                            pgn_out.file = String::from(value);
                        }
                        "verbose" => {
                            pgn_out.verbose = match value {
                                "true" => true,
                                "false" => false,
                                _ => {
                                    eprintln!("Invalid boolean {value} for verbose for -pgnout");
                                    return None;
                                }
                            };
                        }
                        _ => {
                            eprintln!("Invalid key {name} for -pgnout");
                            return None;
                        }
                    }
                }
                if pgn_out.file.is_empty() {
                    eprintln!("output file required for -pgnout option");
                    return None;
                }
                options.pgn = Some(pgn_out);
            }

            "-material" => {
                let mut material = MaterialSettings {
                    score: 10,
                    min_plies: 0,
                };
                while let Some(option) = it.peek()
                    && !option.starts_with("-")
                    && let Some((name, value)) = option.split_once('=')
                {
                    it.next(); // consume token

                    match name {
                        "score" => {
                            material.score = match value.parse::<u32>() {
                                Ok(value) if value > 0 => value,
                                _ => {
                                    eprintln!("Invalid score {value} for -material");
                                    return None;
                                }
                            };
                        }
                        "minplies" => {
                            material.min_plies = match value.parse::<u32>() {
                                Ok(value) => value,
                                _ => {
                                    eprintln!("Invalid minplies {value} for -material");
                                    return None;
                                }
                            };
                        }
                        _ => {
                            eprintln!("Invalid key {name} for -material");
                            return None;
                        }
                    }
                }
                options.adjudication.material = Some(material);
            }

            "-easyfill" => {
                options.adjudication.easyfill = true;
            }

            "-maxplies" => {
                let Some(value) = it.next() else { break };
                options.adjudication.max_plies = match value.to_lowercase().as_str() {
                    "inf" | "infinite" => None,
                    _ => match value.parse::<u32>() {
                        Ok(value) if value > 0 => Some(value),
                        _ => {
                            eprintln!(
                                "invalid maxplies value {value} (must be non-zero unsigned integer)"
                            );
                            return None;
                        }
                    },
                };
            }

            "-timeoutbuffer" => {
                let Some(value) = it.next() else { break };
                match value.parse::<u64>() {
                    Ok(value) => {
                        options.adjudication.timeout_buffer = Duration::from_millis(value);
                    }
                    Err(_) => {
                        eprintln!("Expected milliseconds for -timeoutbuffer option");
                        return None;
                    }
                }
            }

            "-ratinginterval" => {
                let Some(option) = it.next() else { break };
                if let Ok(option) = option.parse::<u64>() {
                    options.report_interval = if option == 0 { None } else { Some(option) };
                } else {
                    eprintln!("invalid interval value {option} (must be unsigned integer)");
                    return None;
                }
            }

            _ => {
                eprintln!("Unknown flag {flag}");
                return None;
            }
        }
    }

    for (name, value) in each_options {
        for engine in &mut options.engines {
            parse_engine_option(engine, &name, &value);
        }
    }

    Some(options)
}
