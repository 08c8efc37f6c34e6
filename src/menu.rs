use chrono::{DateTime, Utc};
use kokous::components::schedule::{printer, MeetingId, ScheduleHandle};
use kokous::config::Config;
use kokous::error::CalResult;
use kokous::utils::time::{format_datetime, parse_datetime, parse_day};
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::RwLock;

type Input = Lines<BufReader<Stdin>>;

const MENU: &str = "\
Meeting calendar
  1) Schedule a meeting
  2) Cancel a meeting
  3) Move a meeting
  4) Add a notification
  5) Show a day
  6) Save a day to file
  7) Quit";

/// Run the interactive menu until the user quits or stdin closes
///
/// Engine rejections are printed and the menu carries on; only I/O
/// failures propagate.
pub async fn run(schedule: ScheduleHandle, config: Arc<RwLock<Config>>) -> CalResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n{}", MENU);
        let Some(choice) = prompt(&mut lines, "> ").await? else {
            return Ok(());
        };

        match choice.trim() {
            "1" => create_meeting(&schedule, &mut lines).await?,
            "2" => cancel_meeting(&schedule, &mut lines).await?,
            "3" => move_meeting(&schedule, &mut lines).await?,
            "4" => add_notification(&schedule, &mut lines).await?,
            "5" => show_day(&schedule, &mut lines).await?,
            "6" => save_day(&schedule, &config, &mut lines).await?,
            "7" | "q" | "quit" => return Ok(()),
            "" => {}
            other => println!("Unknown option: {}", other),
        }
    }
}

async fn create_meeting(schedule: &ScheduleHandle, lines: &mut Input) -> CalResult<()> {
    let Some(begin) = read_datetime(lines, "Begins at (DD.MM.YYYY HH:MM): ").await? else {
        return Ok(());
    };
    let Some(end) = read_datetime(lines, "Ends at (DD.MM.YYYY HH:MM): ").await? else {
        return Ok(());
    };
    let Some(notify_at) = read_optional_datetime(lines, "Notify at (empty for none): ").await?
    else {
        return Ok(());
    };

    match schedule.add(begin, end, notify_at).await {
        Ok(meeting) => println!("Scheduled meeting #{}", meeting.id),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn cancel_meeting(schedule: &ScheduleHandle, lines: &mut Input) -> CalResult<()> {
    let Some(id) = read_id(lines, "Meeting number: ").await? else {
        return Ok(());
    };

    match schedule.remove(id).await {
        Ok(()) => println!("Cancelled meeting #{}", id),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn move_meeting(schedule: &ScheduleHandle, lines: &mut Input) -> CalResult<()> {
    let Some(id) = read_id(lines, "Meeting number: ").await? else {
        return Ok(());
    };
    let Some(begin) = read_datetime(lines, "New begin (DD.MM.YYYY HH:MM): ").await? else {
        return Ok(());
    };
    let Some(end) = read_datetime(lines, "New end (DD.MM.YYYY HH:MM): ").await? else {
        return Ok(());
    };
    let Some(notify_at) = read_optional_datetime(lines, "Notify at (empty for none): ").await?
    else {
        return Ok(());
    };

    match schedule.edit(id, begin, end, notify_at).await {
        Ok(meeting) => println!("Moved meeting #{}", meeting.id),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn add_notification(schedule: &ScheduleHandle, lines: &mut Input) -> CalResult<()> {
    let Some(id) = read_id(lines, "Meeting number: ").await? else {
        return Ok(());
    };
    let Some(notify_at) = read_datetime(lines, "Notify at (DD.MM.YYYY HH:MM): ").await? else {
        return Ok(());
    };

    match schedule.add_notification(id, notify_at).await {
        Ok(meeting) => println!(
            "Will notify about meeting #{} at {}",
            meeting.id,
            format_datetime(notify_at)
        ),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn show_day(schedule: &ScheduleHandle, lines: &mut Input) -> CalResult<()> {
    let Some(day) = read_day(lines, "Day (DD.MM.YYYY): ").await? else {
        return Ok(());
    };

    match schedule.find_all().await {
        Ok(meetings) => printer::print_console(&meetings, day),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn save_day(
    schedule: &ScheduleHandle,
    config: &Arc<RwLock<Config>>,
    lines: &mut Input,
) -> CalResult<()> {
    let Some(day) = read_day(lines, "Day (DD.MM.YYYY): ").await? else {
        return Ok(());
    };

    let output_dir = config.read().await.output_dir.clone();
    let meetings = match schedule.find_all().await {
        Ok(meetings) => meetings,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    match printer::write_file(&meetings, day, Path::new(&output_dir)) {
        Ok(path) => println!("Saved to {}", path.display()),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn prompt(lines: &mut Input, text: &str) -> CalResult<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// Read a datetime; an empty line cancels the operation
async fn read_datetime(lines: &mut Input, label: &str) -> CalResult<Option<DateTime<Utc>>> {
    loop {
        let Some(raw) = prompt(lines, label).await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        if let Some(parsed) = parse_datetime(&raw) {
            return Ok(Some(parsed));
        }
        println!("Could not read that as a date, expected DD.MM.YYYY HH:MM");
    }
}

/// Read a datetime where an empty line means "none"
async fn read_optional_datetime(
    lines: &mut Input,
    label: &str,
) -> CalResult<Option<Option<DateTime<Utc>>>> {
    loop {
        let Some(raw) = prompt(lines, label).await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(Some(None));
        }
        if let Some(parsed) = parse_datetime(&raw) {
            return Ok(Some(Some(parsed)));
        }
        println!("Could not read that as a date, expected DD.MM.YYYY HH:MM");
    }
}

/// Read a meeting number; an empty line cancels the operation
async fn read_id(lines: &mut Input, label: &str) -> CalResult<Option<MeetingId>> {
    loop {
        let Some(raw) = prompt(lines, label).await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        if let Ok(id) = raw.trim().parse::<MeetingId>() {
            return Ok(Some(id));
        }
        println!("Could not read that as a meeting number");
    }
}

/// Read a calendar day; an empty line cancels the operation
async fn read_day(lines: &mut Input, label: &str) -> CalResult<Option<chrono::NaiveDate>> {
    loop {
        let Some(raw) = prompt(lines, label).await? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        if let Some(parsed) = parse_day(&raw) {
            return Ok(Some(parsed));
        }
        println!("Could not read that as a day, expected DD.MM.YYYY");
    }
}
