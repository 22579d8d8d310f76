// src/visibility/filter.rs

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

/// Colunas que a política de visibilidade sabe filtrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    CompanyId,
    ClientId,
    PmId,
    CreatedBy,
    ForemanId,
    AssignedWorkers,
    AssignedTo,
    ProjectId,
    TaskId,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::CompanyId => "company_id",
            Field::ClientId => "client_id",
            Field::PmId => "pm_id",
            Field::CreatedBy => "created_by",
            Field::ForemanId => "foreman_id",
            Field::AssignedWorkers => "assigned_workers",
            Field::AssignedTo => "assigned_to",
            Field::ProjectId => "project_id",
            Field::TaskId => "task_id",
        }
    }

    /// Colunas `UUID[]`.
    pub fn is_array(&self) -> bool {
        matches!(self, Field::AssignedWorkers | Field::AssignedTo)
    }
}

/// Registro que sabe expor os ids de cada campo filtrável.
/// Campos escalares devolvem zero ou um id; arrays devolvem todos.
pub trait Filterable {
    fn field_values(&self, field: Field) -> Vec<Uuid>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Campo escalar igual ao id, ou array que contém o id.
    Eq(Field, Uuid),
    /// Campo escalar dentro do conjunto, ou array que intercepta o conjunto.
    In(Field, Vec<Uuid>),
    Any(Vec<Predicate>),
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn matches<R: Filterable + ?Sized>(&self, row: &R) -> bool {
        match self {
            Predicate::Eq(field, id) => row.field_values(*field).contains(id),
            Predicate::In(field, ids) => row
                .field_values(*field)
                .iter()
                .any(|value| ids.contains(value)),
            Predicate::Any(preds) => preds.iter().any(|p| p.matches(row)),
            Predicate::All(preds) => preds.iter().all(|p| p.matches(row)),
        }
    }

    /// Escreve o predicado como SQL com parâmetros vinculados.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::Eq(field, id) if field.is_array() => {
                qb.push_bind(*id);
                qb.push(" = ANY(").push(field.column()).push(")");
            }
            Predicate::Eq(field, id) => {
                qb.push(field.column()).push(" = ").push_bind(*id);
            }
            Predicate::In(_, ids) if ids.is_empty() => {
                qb.push("FALSE");
            }
            Predicate::In(field, ids) if field.is_array() => {
                qb.push(field.column()).push(" && ").push_bind(ids.clone());
            }
            Predicate::In(field, ids) => {
                qb.push(field.column()).push(" = ANY(").push_bind(ids.clone()).push(")");
            }
            Predicate::Any(preds) => push_joined(qb, preds, " OR ", "FALSE"),
            Predicate::All(preds) => push_joined(qb, preds, " AND ", "TRUE"),
        }
    }
}

fn push_joined(qb: &mut QueryBuilder<'_, Postgres>, preds: &[Predicate], sep: &str, empty: &str) {
    if preds.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, pred) in preds.iter().enumerate() {
        if i > 0 {
            qb.push(sep);
        }
        pred.push_sql(qb);
    }
    qb.push(")");
}

/// Filtro final entregue ao repositório: tenant + predicados da política
/// + estreitamentos pedidos pelo cliente.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// `None` apenas para o SUPER_ADMIN.
    pub tenant: Option<Uuid>,
    pub predicates: Vec<Predicate>,
}

impl RowFilter {
    pub fn for_tenant(tenant: Option<Uuid>) -> Self {
        Self { tenant, predicates: Vec::new() }
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn and_eq(self, field: Field, value: Option<Uuid>) -> Self {
        match value {
            Some(id) => self.and(Predicate::Eq(field, id)),
            None => self,
        }
    }

    /// Acrescenta ` WHERE ...` (sempre presente) ao builder.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");
        if let Some(tenant) = self.tenant {
            qb.push(" AND company_id = ").push_bind(tenant);
        }
        for pred in &self.predicates {
            qb.push(" AND ");
            pred.push_sql(qb);
        }
    }

    pub fn matches<R: Filterable + ?Sized>(&self, row: &R) -> bool {
        let in_tenant = self
            .tenant
            .is_none_or(|tenant| row.field_values(Field::CompanyId).contains(&tenant));
        in_tenant && self.predicates.iter().all(|p| p.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        company_id: Uuid,
        project_id: Uuid,
        assigned_to: Vec<Uuid>,
    }

    impl Filterable for Row {
        fn field_values(&self, field: Field) -> Vec<Uuid> {
            match field {
                Field::CompanyId => vec![self.company_id],
                Field::ProjectId => vec![self.project_id],
                Field::AssignedTo => self.assigned_to.clone(),
                _ => Vec::new(),
            }
        }
    }

    fn render(filter: &RowFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM tasks");
        filter.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn array_fields_use_any_and_overlap() {
        let me = Uuid::new_v4();
        let filter = RowFilter::for_tenant(Some(Uuid::new_v4()))
            .and(Predicate::Any(vec![
                Predicate::Eq(Field::AssignedTo, me),
                Predicate::In(Field::ProjectId, vec![Uuid::new_v4()]),
            ]));
        assert_eq!(
            render(&filter),
            "SELECT * FROM tasks WHERE TRUE AND company_id = $1 AND ($2 = ANY(assigned_to) OR project_id = ANY($3))"
        );
    }

    #[test]
    fn empty_sets_render_as_constants() {
        let filter = RowFilter::for_tenant(None)
            .and(Predicate::In(Field::ProjectId, vec![]))
            .and(Predicate::All(vec![]));
        assert_eq!(render(&filter), "SELECT * FROM tasks WHERE TRUE AND FALSE AND TRUE");
    }

    #[test]
    fn array_in_uses_overlap_operator() {
        let filter = RowFilter::for_tenant(None)
            .and(Predicate::In(Field::AssignedWorkers, vec![Uuid::new_v4()]));
        assert_eq!(render(&filter), "SELECT * FROM tasks WHERE TRUE AND assigned_workers && $1");
    }

    #[test]
    fn in_memory_matching_agrees_with_predicates() {
        let tenant = Uuid::new_v4();
        let me = Uuid::new_v4();
        let row = Row { company_id: tenant, project_id: Uuid::new_v4(), assigned_to: vec![me] };

        let mine = RowFilter::for_tenant(Some(tenant)).and(Predicate::Eq(Field::AssignedTo, me));
        assert!(mine.matches(&row));

        let other_tenant = RowFilter::for_tenant(Some(Uuid::new_v4()));
        assert!(!other_tenant.matches(&row));

        let everyone = RowFilter::for_tenant(None);
        assert!(everyone.matches(&row));

        let nobody = RowFilter::for_tenant(Some(tenant)).and(Predicate::Any(vec![]));
        assert!(!nobody.matches(&row));
    }
}
