// src/services/policy.rs
//
// Checagem de capacidade centralizada: todo ponto de entrada que transiciona
// um pedido consulta estas funções, em vez de cada endpoint decidir sozinho.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{CurrentUser, Role},
        orders::OrderStatus,
    },
};

pub fn is_staff(roles: &[Role]) -> bool {
    roles.iter().any(|role| role.is_staff())
}

// Um ator pode executar `from -> to`? Fornecedores nunca mudam status;
// staff (admin/manager) só pelas arestas da máquina de estados.
pub fn can_transition(roles: &[Role], from: OrderStatus, to: OrderStatus) -> bool {
    is_staff(roles) && from.can_transition_to(to)
}

// Escopo de listagem: staff enxerga todos os pedidos (None), fornecedor
// só os próprios (Some(id)).
pub fn vendor_scope(actor: &CurrentUser) -> Option<Uuid> {
    if actor.is_staff() { None } else { Some(actor.id) }
}

pub fn ensure_staff(actor: &CurrentUser) -> Result<(), AppError> {
    if actor.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Esta ação exige papel de admin ou manager.".into(),
        ))
    }
}

// O papel é verificado antes da aresta: um fornecedor recebe 403 mesmo para
// uma transição que seria válida.
pub fn ensure_transition(
    actor: &CurrentUser,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), AppError> {
    ensure_staff(actor)?;
    if !can_transition(&actor.roles, from, to) {
        return Err(AppError::InvalidTransition { from, to });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::OrderStatus::*;
    use uuid::Uuid;

    fn actor(roles: Vec<Role>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "Ator".into(),
            email: "ator@example.com".into(),
            roles,
        }
    }

    #[test]
    fn vendor_can_never_transition() {
        let roles = [Role::Vendor];
        for from in [Pending, Assigned, Completed, Cancelled] {
            for to in [Pending, Assigned, Completed, Cancelled] {
                assert!(!can_transition(&roles, from, to));
            }
        }
    }

    #[test]
    fn staff_follows_the_state_machine() {
        for staff_role in [Role::Admin, Role::Manager] {
            let roles = [staff_role];
            assert!(can_transition(&roles, Pending, Assigned));
            assert!(can_transition(&roles, Pending, Cancelled));
            assert!(can_transition(&roles, Assigned, Completed));
            assert!(can_transition(&roles, Assigned, Cancelled));

            assert!(!can_transition(&roles, Pending, Completed));
            assert!(!can_transition(&roles, Completed, Assigned));
            assert!(!can_transition(&roles, Cancelled, Pending));
        }
    }

    #[test]
    fn staff_listing_scope_is_unfiltered() {
        assert_eq!(vendor_scope(&actor(vec![Role::Admin])), None);
        assert_eq!(vendor_scope(&actor(vec![Role::Manager])), None);
        assert_eq!(vendor_scope(&actor(vec![Role::Vendor, Role::Manager])), None);
    }

    #[test]
    fn vendor_listing_scope_is_their_own_id() {
        let vendor = actor(vec![Role::Vendor]);
        assert_eq!(vendor_scope(&vendor), Some(vendor.id));

        let no_roles = actor(vec![]);
        assert_eq!(vendor_scope(&no_roles), Some(no_roles.id));
    }

    #[test]
    fn ensure_transition_reports_forbidden_before_invalid_edge() {
        let vendor = actor(vec![Role::Vendor]);
        // Mesmo uma aresta inválida vira 403 para quem não é staff.
        let err = ensure_transition(&vendor, Pending, Completed).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let manager = actor(vec![Role::Manager]);
        let err = ensure_transition(&manager, Pending, Completed).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: Pending,
                to: Completed
            }
        ));
    }

    #[test]
    fn ensure_transition_accepts_valid_staff_moves() {
        let admin = actor(vec![Role::Admin]);
        assert!(ensure_transition(&admin, Pending, Assigned).is_ok());
        assert!(ensure_transition(&admin, Assigned, Completed).is_ok());
    }
}
