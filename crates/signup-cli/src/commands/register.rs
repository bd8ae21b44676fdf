//! Register command
//!
//! Walks the sign-up form field by field on the terminal. Values given as
//! flags are used first; anything missing or rejected is prompted for on
//! stdin unless `--no-input` is set.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::tty::IsTty;
use std::io::{self, BufRead, Write};

use signup_core::display::{self, field_hint, FieldHint, Tone};
use signup_core::{
    Availability, Field, FieldError, FormEvent, HttpUserDirectory, NotificationLevel,
    SignUpContext, SignUpForm, SubmitOutcome, UserDirectory,
};

use super::Context;
use crate::output::{format_hint, print_error, print_success};

#[derive(Args, Default)]
pub struct RegisterArgs {
    /// Email address confirmed in the verification step
    #[arg(long, env = "SIGNUP_EMAIL")]
    pub email: String,

    /// Verification code received by email
    #[arg(long = "code", env = "SIGNUP_VERIFICATION_CODE")]
    pub verification_code: String,

    /// Header issued by the verification step, as NAME:VALUE (repeatable)
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub password_again: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub student_id: Option<String>,
    /// Exact major name, see `signup majors`
    #[arg(long)]
    pub major: Option<String>,

    /// Never prompt; fail on the first missing or invalid value
    #[arg(long)]
    pub no_input: bool,
}

impl RegisterArgs {
    fn context(&self) -> SignUpContext {
        SignUpContext {
            email: self.email.clone(),
            verification_code: self.verification_code.clone(),
            headers: self.headers.clone(),
        }
    }

    fn prefill(&self, field: Field) -> Option<String> {
        match field {
            Field::Username => self.username.clone(),
            Field::Password => self.password.clone(),
            Field::PasswordAgain => self.password_again.clone(),
            Field::FirstName => self.first_name.clone(),
            Field::LastName => self.last_name.clone(),
            Field::StudentId => self.student_id.clone(),
            Field::Major => self.major.clone(),
        }
    }
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("Expected NAME:VALUE, got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Empty header name in {:?}", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub async fn execute(ctx: &Context, args: RegisterArgs) -> Result<()> {
    let majors = ctx.config.majors()?;
    let directory = HttpUserDirectory::new(&ctx.config)?;
    let mut form = SignUpForm::new(args.context(), majors);

    let stdin = io::stdin();
    let hide_secrets = stdin.is_tty();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    match run(&mut form, &directory, &args, &mut input, &mut out, hide_secrets).await? {
        SubmitOutcome::Completed => {
            print_success("Registration complete.", ctx.quiet);
            Ok(())
        }
        SubmitOutcome::Failed => bail!("Registration was not accepted"),
        SubmitOutcome::Blocked(blocker) => bail!("Registration blocked: {:?}", blocker),
    }
}

/// Terminal I/O for one run of the form
struct Prompt<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
    interactive: bool,
    /// Read secret fields from the terminal with echo off
    hide_secrets: bool,
}

impl<R: BufRead, W: Write> Prompt<'_, R, W> {
    fn ask(&mut self, label: &str) -> Result<String> {
        if !self.interactive {
            bail!("No value for {:?} and prompting is disabled", label);
        }
        write!(self.out, "{}: ", label.bold())?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Input closed before the form was complete");
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn ask_secret(&mut self, label: &str) -> Result<String> {
        if !self.interactive || !self.hide_secrets {
            return self.ask(label);
        }
        write!(self.out, "{}: ", label.bold())?;
        self.out.flush()?;
        let value = read_hidden()?;
        writeln!(self.out)?;
        Ok(value)
    }

    fn next_value(&mut self, prefill: &mut Option<String>, field: Field) -> Result<String> {
        match prefill.take() {
            Some(value) => Ok(value),
            None if field.is_secret() => self.ask_secret(field.label()),
            None => self.ask(field.label()),
        }
    }

    fn show(&mut self, hint: &FieldHint) -> Result<()> {
        if let Some(text) = format_hint(hint) {
            writeln!(self.out, "{}", text)?;
        }
        Ok(())
    }

    fn hint(&mut self, form: &SignUpForm, field: Field) -> Result<()> {
        self.show(&field_hint(form, field))
    }

    /// Show a rejected value; falls back to the bare message when the
    /// display policy hides it (e.g. focused and empty)
    fn reject(&mut self, form: &SignUpForm, field: Field, err: FieldError) -> Result<()> {
        match field_hint(form, field) {
            FieldHint::Hidden if err.is_required() => self.show(&FieldHint::RequiredWarning),
            FieldHint::Hidden => self.show(&FieldHint::Message {
                text: err.message(),
                tone: Tone::Error,
            }),
            hint => self.show(&hint),
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        if !self.interactive {
            return Ok(false);
        }
        let answer = self.ask(question)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn event(&mut self, event: &FormEvent) -> Result<()> {
        if let FormEvent::Notify(notification) = event {
            let text = match notification.level {
                NotificationLevel::Success => notification.message.green(),
                NotificationLevel::Failure => notification.message.red(),
            };
            writeln!(self.out, "{}", text)?;
        }
        Ok(())
    }
}

/// Read one line from the terminal without echoing it
fn read_hidden() -> Result<String> {
    terminal::enable_raw_mode()?;
    let result = read_hidden_keys();
    terminal::disable_raw_mode()?;
    result
}

fn read_hidden_keys() -> Result<String> {
    let mut value = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            if apply_hidden_key(&mut value, key)? {
                return Ok(value);
            }
        }
    }
}

/// Apply one key press to a hidden entry; `true` once Enter is pressed
fn apply_hidden_key(value: &mut String, key: KeyEvent) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }
    match key.code {
        KeyCode::Enter => return Ok(true),
        KeyCode::Backspace => {
            value.pop();
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            bail!("Interrupted")
        }
        KeyCode::Char(c) => value.push(c),
        _ => {}
    }
    Ok(false)
}

/// Drive the form to a submission outcome
pub async fn run<D, R, W>(
    form: &mut SignUpForm,
    directory: &D,
    args: &RegisterArgs,
    input: &mut R,
    out: &mut W,
    hide_secrets: bool,
) -> Result<SubmitOutcome>
where
    D: UserDirectory + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut prompt = Prompt {
        input,
        out,
        interactive: !args.no_input,
        hide_secrets,
    };

    enter_username(form, directory, args.prefill(Field::Username), &mut prompt).await?;
    for field in [
        Field::Password,
        Field::PasswordAgain,
        Field::FirstName,
        Field::LastName,
        Field::StudentId,
    ] {
        enter_field(form, field, args.prefill(field), &mut prompt)?;
    }
    choose_major(form, args.prefill(Field::Major), &mut prompt)?;

    loop {
        form.submit_click();
        let outcome = form.submit(directory).await;
        for event in form.drain_events() {
            prompt.event(&event)?;
        }
        match outcome {
            SubmitOutcome::Failed if prompt.confirm("Retry? [y/N]")? => continue,
            other => return Ok(other),
        }
    }
}

async fn enter_username<D, R, W>(
    form: &mut SignUpForm,
    directory: &D,
    mut prefill: Option<String>,
    prompt: &mut Prompt<'_, R, W>,
) -> Result<()>
where
    D: UserDirectory + ?Sized,
    R: BufRead,
    W: Write,
{
    form.focus_field(Field::Username);
    prompt.hint(form, Field::Username)?;

    loop {
        let value = prompt.next_value(&mut prefill, Field::Username)?;
        form.set_value(Field::Username, value)?;

        match form.check_username_availability(directory).await {
            Some(Availability::Available) => {
                prompt.show(&FieldHint::Message {
                    text: display::AVAILABLE,
                    tone: Tone::Success,
                })?;
                return Ok(());
            }
            Some(Availability::Taken) => prompt.hint(form, Field::Username)?,
            None => match form.error(Field::Username) {
                Some(err) => prompt.reject(form, Field::Username, err)?,
                None => writeln!(
                    prompt.out,
                    "{}",
                    "  Could not reach the user directory, try again".red()
                )?,
            },
        }

        if !prompt.interactive {
            bail!(
                "User ID {:?} cannot be used: {}",
                form.value(Field::Username),
                username_problem(form)
            );
        }
    }
}

fn username_problem(form: &SignUpForm) -> &'static str {
    match display::username_status(form) {
        display::UsernameStatus::Unavailable => display::USERNAME_IN_USE,
        display::UsernameStatus::RequiredEmpty => "Required",
        display::UsernameStatus::InvalidFormat => display::USERNAME_RULES[1],
        _ => "availability could not be checked",
    }
}

fn enter_field<R: BufRead, W: Write>(
    form: &mut SignUpForm,
    field: Field,
    mut prefill: Option<String>,
    prompt: &mut Prompt<'_, R, W>,
) -> Result<()> {
    form.focus_field(field);
    prompt.hint(form, field)?;

    loop {
        let value = prompt.next_value(&mut prefill, field)?;
        form.set_value(field, value)?;

        let Some(err) = form.error(field) else {
            if field == Field::Password {
                prompt.hint(form, field)?;
            }
            return Ok(());
        };
        prompt.reject(form, field, err)?;
        if !prompt.interactive {
            bail!("{}: {}", field, err);
        }
    }
}

fn choose_major<R: BufRead, W: Write>(
    form: &mut SignUpForm,
    prefill: Option<String>,
    prompt: &mut Prompt<'_, R, W>,
) -> Result<()> {
    form.open_major_picker();

    if let Some(major) = prefill {
        match form.select_major(&major) {
            Ok(()) => return Ok(()),
            Err(e) if !prompt.interactive => return Err(e.into()),
            Err(e) => print_error(&e.to_string()),
        }
    }

    loop {
        let query = prompt.ask("Search major (empty for all)")?;
        form.set_major_query(query);
        let options: Vec<String> = form.major_options().into_iter().map(String::from).collect();
        if options.is_empty() {
            writeln!(prompt.out, "  No major found.")?;
            continue;
        }
        for (i, option) in options.iter().enumerate() {
            writeln!(prompt.out, "  {:>3}. {}", i + 1, option)?;
        }

        let choice = prompt.ask("Select major (number or exact name)")?;
        let value = match choice.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].clone(),
            _ => choice,
        };
        match form.select_major(&value) {
            Ok(()) => return Ok(()),
            Err(e) => writeln!(prompt.out, "  {}", e.to_string().red())?,
        }
    }
}
