use std::io::{BufRead, Write};
use std::path::Path;

use colored::Colorize;
use rand::Rng;

use crate::cli::{file_or, recover};
use crate::console::{Console, Reply};
use crate::error::Result;
use crate::flashcards::{answers_match, Deck, QuizMode};
use crate::settings::load_settings;

const WRAP_WIDTH: usize = 72;

const MENU: &[&str] = &[
    "1. Load flashcards",
    "2. Test yourself",
    "3. Display current flashcards",
    "4. Add a flashcard",
    "5. Remove a flashcard",
    "6. Save flashcards",
    "7. Quit",
];

pub fn run(file: Option<String>) -> Result<()> {
    let path = file_or(file, load_settings().flashcards_path());
    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout());
    run_session(&mut console, &path, &mut rand::thread_rng())
}

/// `None` when there is no usable deck on disk: the file is missing or
/// couldn't be read as a deck.
fn load<R: BufRead, W: Write>(console: &mut Console<R, W>, path: &Path) -> Result<Option<Deck>> {
    console.say(format!("Loading from: {}", path.display()))?;
    match Deck::load(path) {
        Ok(deck) => {
            console.say(format!("Loaded {} flashcards.", deck.len()).green())?;
            Ok(Some(deck))
        }
        Err(e) if e.is_not_found() => {
            console.say("No saved flashcards found.".yellow())?;
            Ok(None)
        }
        Err(e) => {
            log::warn!("could not load {}: {e}", path.display());
            console.say(format!("Error loading flashcards: {e}").red())?;
            Ok(None)
        }
    }
}

pub fn run_session<R: BufRead, W: Write, G: Rng>(
    console: &mut Console<R, W>,
    path: &Path,
    rng: &mut G,
) -> Result<()> {
    log::info!("flashcard session on {}", path.display());
    let mut deck = match load(console, path)? {
        Some(deck) => deck,
        None => {
            console.say("Starting with an empty set.")?;
            Deck::default()
        }
    };

    loop {
        console.say("\nWelcome to the Flashcard App.\n".bold())?;
        for item in MENU {
            console.say(item)?;
        }
        console.blank()?;
        let choice = console
            .read_line("Enter your choice (1-7): ")?
            .unwrap_or_else(|| "7".to_string());

        match choice.as_str() {
            "1" => {
                // Nothing usable on disk keeps whatever is already in memory.
                match load(console, path)? {
                    Some(loaded) => deck = loaded,
                    None if deck.is_empty() => {}
                    None => {
                        console.say(format!("Keeping the {} flashcards in memory.", deck.len()))?
                    }
                }
            }
            "2" => review(&deck, console, rng)?,
            "3" => {
                display(&deck, console)?;
                console.pause("\nPress Enter to go back to the main menu.")?;
            }
            "4" => add_cards(&mut deck, console)?,
            "5" => remove_card(&mut deck, console)?,
            "6" => {
                let result = deck.save(path);
                if result.is_ok() {
                    console.say("Flashcards saved successfully.".green())?;
                }
                recover(console, result)?;
            }
            "7" => {
                console.say("Thanks for using the flashcard app!")?;
                break;
            }
            _ => console.say("Invalid input. Please enter a number between 1 and 7.".red())?,
        }
    }
    Ok(())
}

fn display<R: BufRead, W: Write>(deck: &Deck, console: &mut Console<R, W>) -> Result<()> {
    if deck.is_empty() {
        return console.say("You have no flashcards yet.".yellow());
    }
    console.say("Below are all your flashcards:")?;
    for card in deck.iter() {
        console.blank()?;
        console.say(textwrap::fill(&format!("Front: {}", card.term), WRAP_WIDTH))?;
        console.say(textwrap::fill(&format!("Back: {}", card.definition), WRAP_WIDTH))?;
    }
    Ok(())
}

fn add_cards<R: BufRead, W: Write>(deck: &mut Deck, console: &mut Console<R, W>) -> Result<()> {
    loop {
        console.say("Enter the following information for the flashcard or enter 'q' to quit.")?;
        let Reply::Line(term) = console.ask("Front of card: ")? else {
            return Ok(());
        };
        if term.is_empty() {
            console.say("The front of the card can't be empty.".red())?;
            continue;
        }
        if deck.contains(&term) {
            console.say("This term already exists. Please enter a different term.".red())?;
            continue;
        }
        let Reply::Line(definition) = console.ask("Back of card: ")? else {
            console.say("Card discarded.".yellow())?;
            return Ok(());
        };
        deck.add(&term, &definition)?;
        log::debug!("added flashcard {term:?}");
        console.say(format!("Flashcard added: {term} - {definition}").green())?;
    }
}

fn remove_card<R: BufRead, W: Write>(deck: &mut Deck, console: &mut Console<R, W>) -> Result<()> {
    if deck.is_empty() {
        return console.say("You have no flashcards to remove.".yellow());
    }
    display(deck, console)?;
    console.blank()?;
    loop {
        let Reply::Line(term) = console.ask("Type the term on the front of the card to delete it, or q to quit: ")? else {
            return Ok(());
        };
        match deck.remove(&term) {
            Some(card) => {
                log::debug!("removed flashcard {:?}", card.term);
                return console.say(format!("Flashcard '{}' removed.", card.term).green());
            }
            None => console.say("That is not one of your flashcards.".red())?,
        }
    }
}

fn review<R: BufRead, W: Write, G: Rng>(
    deck: &Deck,
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<()> {
    loop {
        let Reply::Line(choice) = console.ask(
            "Type '1' to see a term and guess the definition, '2' to see a definition and guess the term, or 'q' to quit: ",
        )?
        else {
            return Ok(());
        };
        let Some(card) = deck.random(rng) else {
            return console.say("No flashcards available. Add some first.".yellow());
        };
        let Some(mode) = QuizMode::from_choice(&choice) else {
            console.say("Invalid input. Please enter '1', '2' or 'q'.".red())?;
            continue;
        };

        let (shown, expected) = mode.sides(card);
        let (question, side) = match mode {
            QuizMode::TermFirst => ("What is the definition for", "definition"),
            QuizMode::DefinitionFirst => ("What is the term for", "term"),
        };
        console.say(format!("{question}: {shown}"))?;
        let Reply::Line(answer) = console.ask("> ")? else {
            return Ok(());
        };
        if answers_match(&answer, expected) {
            console.say("You are correct!".green())?;
        } else {
            console.say(format!("The correct {side} was: {expected}").red())?;
        }
    }
}
