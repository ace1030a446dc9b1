//! TOML listing of parsed triggers, for reviewing what a text compiles to without committing it.

use chk_data::{Action, ActionDescriptor, Condition, ConditionDescriptor};
use toml_edit::{Array, ArrayOfTables, Document, InlineTable, Item, Table, Value, value};

use crate::parser::ParsedTrigger;

/// Render parsed triggers as a `[[triggers]]` document. Zero-valued record fields are left out;
/// `type` and `name` are always present.
pub fn triggers_to_toml(parsed: &[ParsedTrigger]) -> String {
    let mut doc = Document::new();
    let mut aot = ArrayOfTables::new();

    for (index, entry) in parsed.iter().enumerate() {
        let trigger = &entry.trigger;
        let mut table = Table::new();
        table
            .decor_mut()
            .set_prefix(format!("# trigger {index} (source line {})\n", entry.src_line));

        let mut owners = Array::default();
        for (slot, _) in trigger.owners.iter().enumerate().filter(|(_, owned)| **owned != 0) {
            owners.push(slot as i64);
        }
        table["owners"] = value(owners);
        if trigger.flags != 0 {
            table["flags"] = value(i64::from(trigger.flags));
        }

        let mut conditions = Array::default();
        for condition in &trigger.conditions {
            conditions.push(Value::from(condition_table(condition)));
        }
        table["conditions"] = value(conditions);

        let mut actions = Array::default();
        for action in &trigger.actions {
            actions.push(Value::from(action_table(action)));
        }
        table["actions"] = value(actions);

        aot.push(table);
    }

    doc["triggers"] = Item::ArrayOfTables(aot);
    doc.to_string()
}

fn insert_nonzero(table: &mut InlineTable, key: &str, number: u32) {
    if number != 0 {
        table.insert(key, Value::from(i64::from(number)));
    }
}

fn condition_table(condition: &Condition) -> InlineTable {
    let name = ConditionDescriptor::for_type(condition.condition_type)
        .map_or("Custom", |descriptor| descriptor.name);
    let mut t = InlineTable::new();
    t.insert("type", Value::from(i64::from(condition.condition_type)));
    t.insert("name", Value::from(name));
    insert_nonzero(&mut t, "location", condition.location_id);
    insert_nonzero(&mut t, "player", condition.player);
    insert_nonzero(&mut t, "amount", condition.amount);
    insert_nonzero(&mut t, "unit", u32::from(condition.unit_type));
    insert_nonzero(&mut t, "comparison", u32::from(condition.comparison));
    insert_nonzero(&mut t, "type_index", u32::from(condition.type_index));
    insert_nonzero(&mut t, "flags", u32::from(condition.flags));
    insert_nonzero(&mut t, "mask_flag", u32::from(condition.mask_flag));
    t
}

fn action_table(action: &Action) -> InlineTable {
    let name = ActionDescriptor::for_type(action.action_type).map_or("Custom", |descriptor| descriptor.name);
    let mut t = InlineTable::new();
    t.insert("type", Value::from(i64::from(action.action_type)));
    t.insert("name", Value::from(name));
    insert_nonzero(&mut t, "location", action.location_id);
    insert_nonzero(&mut t, "string", action.string_id);
    insert_nonzero(&mut t, "sound", action.sound_string_id);
    insert_nonzero(&mut t, "time", action.time);
    insert_nonzero(&mut t, "group", action.group);
    insert_nonzero(&mut t, "number", action.number);
    insert_nonzero(&mut t, "type_index", u32::from(action.type_index));
    insert_nonzero(&mut t, "secondary_type", u32::from(action.secondary_type));
    insert_nonzero(&mut t, "flags", u32::from(action.flags));
    insert_nonzero(&mut t, "padding", u32::from(action.padding));
    insert_nonzero(&mut t, "mask_flag", u32::from(action.mask_flag));
    t
}
