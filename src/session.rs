use crate::table::Table;

/// Identity of a loaded result: same connection, same statement text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryKey {
    pub connection_string: String,
    pub query: String,
}

/// Everything one running instance knows about the user's work. Created empty
/// at startup and dropped at exit; nothing is written to disk.
#[derive(Debug, Default)]
pub struct Session {
    pub connection_string: Option<String>,
    pub query_text: Option<String>,
    pub table: Option<Table>,
    pub working: Option<Table>,
    pub analysis: Option<String>,
    loaded: Option<QueryKey>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connection_string(&mut self, connection_string: String) {
        self.connection_string = Some(connection_string);
    }

    /// Replaces the result table wholesale and starts a fresh working copy.
    pub fn store_table(&mut self, key: QueryKey, table: Table) {
        self.working = Some(table.clone());
        self.table = Some(table);
        self.loaded = Some(key);
    }

    pub fn store_analysis(&mut self, text: String) {
        self.analysis = Some(text);
    }

    pub fn reset_working_copy(&mut self) {
        self.working = self.table.clone();
    }

    pub fn is_loaded(&self, key: &QueryKey) -> bool {
        self.table.is_some() && self.loaded.as_ref() == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn key(query: &str) -> QueryKey {
        QueryKey {
            connection_string: "mysql://newuser:pw@localhost:3306/classicmodels".into(),
            query: query.into(),
        }
    }

    #[test]
    fn storing_a_table_replaces_previous_contents_and_working_copy() {
        let mut session = Session::new();
        let first = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Int(1), Value::Int(2)]; 3],
        );
        session.store_table(key("q1"), first);
        session.working.as_mut().unwrap().set_cell(0, 0, Value::Int(99));

        let second = Table::new(vec!["c".into()], vec![vec![Value::Text("x".into())]]);
        session.store_table(key("q2"), second.clone());

        assert_eq!(session.table.as_ref(), Some(&second));
        assert_eq!(session.working.as_ref(), Some(&second));
        assert!(session.is_loaded(&key("q2")));
        assert!(!session.is_loaded(&key("q1")));
    }

    #[test]
    fn reset_restores_working_copy_from_result() {
        let mut session = Session::new();
        let table = Table::new(vec!["a".into()], vec![vec![Value::Int(1)]]);
        session.store_table(key("q"), table.clone());
        session.working.as_mut().unwrap().set_cell(0, 0, Value::Int(5));
        assert_eq!(session.table.as_ref(), Some(&table));

        session.reset_working_copy();
        assert_eq!(session.working.as_ref(), Some(&table));
    }

    #[test]
    fn analysis_is_overwritten_not_accumulated() {
        let mut session = Session::new();
        session.store_analysis("first".into());
        session.store_analysis("second".into());
        assert_eq!(session.analysis.as_deref(), Some("second"));
    }
}
