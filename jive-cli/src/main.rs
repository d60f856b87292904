use std::{env, fs, io, io::Read};

use jive_core::{
    error::Error,
    item::{Item, MenuPage},
    record::Record,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let body = match args.get(1).map(String::as_str) {
        Some(path) => fs::read_to_string(path).expect("Failed to read the response file"),
        None => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .expect("Failed to read stdin");
            body
        }
    };

    match decode(&body) {
        Ok(page) => {
            println!("{} of {} items:", page.items.len(), page.total);
            for item in &page.items {
                print_item(item, 1);
            }
        }
        Err(err) => {
            log::error!("failed to decode response: {}", err);
            std::process::exit(1);
        }
    }
}

fn decode(body: &str) -> Result<MenuPage, Error> {
    let value = serde_json::from_str(body)?;
    let record = Record::from_value(&value).ok_or(Error::UnexpectedResponse)?;
    MenuPage::from_record(&record)
}

fn print_item(item: &Item, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut line = format!("{}{} [{}]", indent, item.name, item.id);
    if !item.text2.is_empty() {
        line.push_str(&format!(" - {}", item.text2));
    }
    if let Some(window) = &item.window {
        line.push_str(&format!(" ({:?})", window.style));
    }
    println!("{}", line);

    let slots = [
        ("go", &item.go_action),
        ("play", &item.play_action),
        ("add", &item.add_action),
        ("insert", &item.insert_action),
        ("more", &item.more_action),
    ];
    for (name, action) in slots {
        if let Some(invocation) = action.as_ref().and_then(|action| action.invocation()) {
            println!("{}  {}: {}", indent, name, invocation.cmd.join(" "));
        }
    }
    if let Some(command) = &item.download_command {
        println!("{}  download: {}", indent, command.cmd.join(" "));
    }

    if let Some(children) = &item.sub_items {
        for child in children {
            print_item(child, depth + 1);
        }
    }
}
