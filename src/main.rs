use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::{
    io::{self, stdin, Write},
    str::FromStr,
};

mod error;
mod lesson;
mod parser;
mod quiz;
mod record;
mod session;
mod source;
mod store;

use lesson::LessonIndex;
use quiz::render_side;
use record::{AnswerDirection, CardSide, GlossLanguage, LanguageSet, VocabularyRecord};
use session::{ActiveRecordSource, FlashcardSession, Flip, QuizSession, QuizState};
use source::{BundledSource, TextSource};
use store::{FileStore, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Activity {
    /// Print the lesson's vocabulary table.
    List,
    /// Sequential card review with flip.
    Flashcards,
    /// Multiple-choice quiz.
    Quiz,
}

#[derive(Parser, Debug)]
struct Args {
    /// Bundled book to load.
    #[arg(short, long, default_value = "book1")]
    book: String,
    /// Lesson code to study (e.g. "2-1"); defaults to the first lesson.
    #[arg(short, long)]
    lesson: Option<String>,
    #[arg(short, long, value_enum, default_value = "flashcards")]
    activity: Activity,
    /// Which side is the prompt and which the answer.
    #[arg(short, long, value_enum, default_value = "headword-to-meaning")]
    mode: AnswerDirection,
    /// Comma-separated gloss languages to show on meaning sides.
    #[arg(short = 'g', long, default_value = "english")]
    languages: String,
    /// Study the words marked difficult instead of a lesson.
    #[arg(long, default_value = "false")]
    difficult: bool,
    /// List available lessons and exit.
    #[arg(long, default_value = "false")]
    list_lessons: bool,
    /// List bundled books and exit.
    #[arg(long, default_value = "false")]
    list_books: bool,
}

enum Commands {
    Flip,
    Next,
    Prev,
    Shuffle,
    Mark,
    Answer(String),
    Help,
    Quit,
}

impl Commands {
    fn help() {
        println!("Available commands:");
        println!("  <enter>  - Flip the current card");
        println!("  n / p    - Next / previous card");
        println!("  1-4      - Answer the current quiz question");
        println!("  \\s       - Shuffle cards, or restart the quiz");
        println!("  \\m       - Mark the current word as difficult");
        println!("  \\h       - Show this help message");
        println!("  \\q       - Quit");
    }
}

impl FromStr for Commands {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Commands::Flip),
            "n" => Ok(Commands::Next),
            "p" => Ok(Commands::Prev),
            "\\s" => Ok(Commands::Shuffle),
            "\\m" => Ok(Commands::Mark),
            "\\h" => Ok(Commands::Help),
            "\\q" => Ok(Commands::Quit),
            _ if s.starts_with('\\') => Err("Unknown command".to_string()),
            _ => Ok(Commands::Answer(s.to_string())),
        }
    }
}

/// Reads one trimmed input line; EOF behaves like quit.
fn read_command() -> Result<Commands> {
    loop {
        print!("|> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let bytes = stdin()
            .read_line(&mut input)
            .context("Failed to read line from stdin")?;
        if bytes == 0 {
            return Ok(Commands::Quit);
        }

        match Commands::from_str(input.trim()) {
            Ok(command) => return Ok(command),
            Err(e) => eprintln!("Invalid command: {}. Type \\h for help.", e),
        }
    }
}

fn parse_languages(input: &str) -> Result<LanguageSet> {
    let mut languages = LanguageSet::empty();
    for part in input.split(',') {
        let lang: GlossLanguage = part.parse().map_err(anyhow::Error::msg)?;
        languages.insert(lang);
    }
    if languages.is_empty() {
        bail!("at least one gloss language must be enabled");
    }
    Ok(languages)
}

fn run_flashcards(
    pool: &[VocabularyRecord],
    mode: AnswerDirection,
    languages: &LanguageSet,
    store: &mut dyn KeyValueStore,
    book_id: &str,
) -> Result<()> {
    let mut session =
        FlashcardSession::new(pool.len()).context("Cannot start flashcards on an empty pool")?;

    println!(
        "Flashcards: {} cards. Enter flips, n/p moves, \\h for help.",
        pool.len()
    );
    loop {
        let record = &pool[session.current()];
        let (cursor, total) = session.position();
        let side = match session.face() {
            Flip::Front => mode.prompt_side(),
            Flip::Back => mode.answer_side(),
        };
        println!(
            "\n[{}/{}] {}",
            cursor + 1,
            total,
            render_side(record, side, languages)
        );

        match read_command()? {
            Commands::Flip => session.flip(),
            Commands::Next => session.next(),
            Commands::Prev => session.prev(),
            Commands::Shuffle => {
                session.shuffle();
                println!("Shuffled.");
            }
            Commands::Mark => {
                store::mark_difficult(store, book_id, &record.headword);
                println!("Marked {} as difficult.", record.headword);
            }
            Commands::Answer(_) => {
                eprintln!("Not a quiz; press enter to flip or \\h for help.");
            }
            Commands::Help => Commands::help(),
            Commands::Quit => {
                println!("Quitting...");
                break;
            }
        }
    }

    let marked = store::difficult_words(store, book_id);
    if !marked.is_empty() {
        println!(
            "{} word(s) marked difficult; rerun with --difficult to drill them.",
            marked.len()
        );
    }
    Ok(())
}

fn run_quiz(pool: &[VocabularyRecord], mode: AnswerDirection, languages: LanguageSet) -> Result<()> {
    let questions = quiz::generate(pool, mode, languages)?;
    let mut session = QuizSession::new(questions);

    println!(
        "Quiz started ({} mode). Answer with 1-{}.",
        mode,
        quiz::MAX_DISTRACTORS + 1
    );
    loop {
        match session.state() {
            QuizState::InProgress { index, total } => {
                let question = session
                    .current()
                    .context("Quiz session lost its current question")?;
                println!(
                    "\nQuestion {}/{}: {}",
                    index + 1,
                    total,
                    question.prompt(pool)
                );
                for (i, text) in question.option_texts(pool).iter().enumerate() {
                    println!("  {}. {}", i + 1, text);
                }

                match read_command()? {
                    Commands::Answer(input) => {
                        let choice = match input.parse::<usize>() {
                            Ok(n) if n >= 1 => n,
                            _ => {
                                eprintln!("Answer with an option number.");
                                continue;
                            }
                        };
                        match session.select(choice - 1) {
                            Some(true) => println!("Correct!"),
                            Some(false) => {
                                let question = session
                                    .current()
                                    .context("Quiz session lost its current question")?;
                                println!(
                                    "Incorrect. The correct answer is: {}",
                                    question.option_texts(pool)[question.correct_position()]
                                );
                            }
                            None => eprintln!("No such option."),
                        }
                        session.advance();
                    }
                    Commands::Shuffle => {
                        session.retry(quiz::generate(pool, mode, languages)?);
                        println!("Restarted.");
                    }
                    Commands::Help => Commands::help(),
                    Commands::Quit => {
                        println!("Quitting...");
                        return Ok(());
                    }
                    _ => eprintln!("Answer with an option number, or \\h for help."),
                }
            }
            QuizState::Results { score, total } => {
                println!("\nFinished: {} / {} correct.", score, total);
                println!("\\s retries with fresh questions, \\q quits.");
                match read_command()? {
                    Commands::Shuffle => {
                        session.retry(quiz::generate(pool, mode, languages)?);
                    }
                    Commands::Quit => return Ok(()),
                    Commands::Help => Commands::help(),
                    _ => {}
                }
            }
        }
    }
}

fn list_records(pool: &[VocabularyRecord], languages: &LanguageSet) {
    for record in pool {
        println!(
            "{}\t{}\t{}\t{}",
            record.headword,
            record.romanization,
            record.part_of_speech,
            render_side(record, CardSide::Meaning, languages)
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let source = BundledSource;
    if args.list_books {
        println!("Available books:");
        for id in source.book_ids() {
            println!("  {}", id);
        }
        return Ok(());
    }

    let raw = source
        .fetch_text(&args.book)
        .with_context(|| format!("Failed to load book '{}'", args.book))?;

    let outcome = parser::parse(&raw)?;
    if outcome.skipped_rows > 0 {
        eprintln!(
            "Warning: skipped {} malformed row(s) in book '{}'.",
            outcome.skipped_rows, args.book
        );
    }
    if outcome.records.is_empty() {
        println!("Book '{}' contains no usable vocabulary records.", args.book);
        return Ok(());
    }

    let index = LessonIndex::build(outcome.records);

    if args.list_lessons {
        println!("Lessons in '{}':", args.book);
        for code in index.lesson_codes() {
            println!("  {} ({} words)", code, index.for_lesson(code).len());
        }
        return Ok(());
    }

    let languages = parse_languages(&args.languages)?;
    let mut store = FileStore::default_location();

    let record_source = if args.difficult {
        ActiveRecordSource::difficult(&index, &store, &args.book).with_context(|| {
            format!("no words are marked difficult in book '{}'", args.book)
        })?
    } else {
        let code = match args.lesson {
            Some(code) => code.trim().to_string(),
            None => index
                .lesson_codes()
                .first()
                .cloned()
                .context("Book has no lessons")?,
        };
        if !index.contains(&code) {
            bail!("book '{}' has no lesson '{}'", args.book, code);
        }
        ActiveRecordSource::Lesson(code)
    };

    let pool = record_source.resolve(&index);
    println!(
        "Studying {} from '{}' ({} words).",
        record_source.describe(),
        args.book,
        pool.len()
    );

    match args.activity {
        Activity::List => list_records(&pool, &languages),
        Activity::Flashcards => {
            run_flashcards(&pool, args.mode, &languages, &mut store, &args.book)?
        }
        Activity::Quiz => run_quiz(&pool, args.mode, languages)?,
    }

    Ok(())
}
