use pgdbml_core::ReferentialAction;

/// Convert a `pg_constraint` action code (`confdeltype`/`confupdtype`).
pub fn fk_action_from_code(code: i8) -> ReferentialAction {
    match code as u8 as char {
        'r' => ReferentialAction::Restrict,
        'c' => ReferentialAction::Cascade,
        'n' => ReferentialAction::SetNull,
        'd' => ReferentialAction::SetDefault,
        _ => ReferentialAction::NoAction,
    }
}
