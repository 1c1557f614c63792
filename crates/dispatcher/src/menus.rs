//! Menu screens, one builder per screen.

use bot_core::{Command, MenuButton, MenuMarkup};
use database::User;

/// Main menu. Its shape depends on who is looking at it: unregistered
/// visitors get registration, admins get the AI switch and statistics.
pub fn start_menu(user: Option<&User>, chat_running: bool, can_go_back: bool) -> MenuMarkup {
    match user {
        None => unregistered_menu(can_go_back),
        Some(user) if user.is_admin => admin_menu(chat_running, can_go_back),
        Some(_) => user_menu(can_go_back),
    }
}

fn unregistered_menu(can_go_back: bool) -> MenuMarkup {
    let mut bottom = vec![MenuButton::new("Контакты", Command::Contacts)];
    if can_go_back {
        bottom.push(MenuButton::new("Назад", Command::Back));
    }

    MenuMarkup::new()
        .row(vec![
            MenuButton::new("Регистрация", Command::SignUp),
            MenuButton::new("О программе", Command::About),
        ])
        .row(bottom)
}

fn user_menu(can_go_back: bool) -> MenuMarkup {
    let mut bottom = vec![MenuButton::new("Контакты", Command::Contacts)];
    if can_go_back {
        bottom.push(MenuButton::new("Назад", Command::Back));
    }

    MenuMarkup::new()
        .row(vec![
            MenuButton::new("Анализы", Command::Analysis),
            MenuButton::new("О программе", Command::About),
            MenuButton::new("Выйти", Command::Exit),
        ])
        .row(bottom)
}

fn admin_menu(chat_running: bool, can_go_back: bool) -> MenuMarkup {
    let on_off_label = if chat_running {
        "Остановить AI"
    } else {
        "Запустить AI"
    };

    let mut bottom = vec![
        MenuButton::new("Контакты", Command::Contacts),
        MenuButton::new("О программе", Command::About),
    ];
    if can_go_back {
        bottom.push(MenuButton::new("Назад", Command::Back));
    }

    MenuMarkup::new()
        .row(vec![
            MenuButton::new("Анализы", Command::Analysis),
            MenuButton::new(on_off_label, Command::OnOff),
            MenuButton::new("Статистика", Command::Statistics),
        ])
        .row(bottom)
}

/// Analyses menu: history, upload, manual entry.
pub fn analyses_menu() -> MenuMarkup {
    MenuMarkup::new()
        .row(vec![
            MenuButton::new("История анализов", Command::History),
            MenuButton::new("Загрузить pdf", Command::Pdf),
        ])
        .row(vec![
            MenuButton::new("Ввести вручную", Command::Manual),
            MenuButton::new("Назад", Command::Back),
        ])
}

/// Manual vitals entry menu.
pub fn manual_menu() -> MenuMarkup {
    MenuMarkup::new().row(vec![
        MenuButton::new("Температура тела", Command::Temperature),
        MenuButton::new("Артериальное давление", Command::Pressure),
    ])
}

/// Record history menu, one button per record kind.
pub fn history_menu() -> MenuMarkup {
    MenuMarkup::new().row(vec![
        MenuButton::new("Анализы", Command::AnalysisHistory),
        MenuButton::new("Температура тела", Command::TemperatureHistory),
        MenuButton::new("Артериальное давление", Command::PressureHistory),
    ])
}

/// Account deletion confirmation menu.
pub fn exit_menu() -> MenuMarkup {
    MenuMarkup::new().row(vec![
        MenuButton::new("Подтвердить", Command::Ok),
        MenuButton::new("Отменить", Command::Cancel),
    ])
}
