//! Input validation for the request payloads.
//!
//! Validators collect every failing field into one map so a single response
//! reports all problems, mirroring how the API behaved under
//! express-validator. Error messages are the ones clients already know.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use url::Url;

use crate::{
    error::{Error, Result, ValidationErrors},
    models::{
        cabanas::{CabanaRequest, Disponibilidad, DisponibilidadQuery},
        reservas::CrearReservaRequest,
        servicios::ServicioRequest,
        usuarios::{LoginRequest, RegistroRequest},
    },
};

/// Upper bound on each occupant count. Keeps the party size within anything
/// a cabin could hold and keeps `adultos + ninos` far from i32 overflow.
const MAX_OCUPANTES: i32 = 20;

/// Accumulates field-level validation failures.
#[derive(Debug, Default)]
pub struct FieldErrors {
    fields: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        // First failure per field wins, as with chained express-validator rules.
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn into_result(self) -> Result<()> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(ValidationErrors::Multiple {
                fields: self.fields,
            }))
        }
    }
}

/// Light-weight email shape check: one `@`, dotted domain, no spaces.
pub fn email_valido(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > 254 || email.contains(' ') || email.contains("..") {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        _ => false,
    }
}

pub fn validar_registro(req: &RegistroRequest) -> Result<()> {
    let mut errors = FieldErrors::new();

    if req.nombre.trim().is_empty() {
        errors.add("nombre", "El nombre es requerido");
    }
    if req.apellido.trim().is_empty() {
        errors.add("apellido", "El apellido es requerido");
    }
    if req.email.trim().is_empty() {
        errors.add("email", "El email es requerido");
    } else if !email_valido(&req.email) {
        errors.add("email", "Email inválido");
    }
    let telefono = req.telefono.trim();
    if telefono.is_empty() {
        errors.add("telefono", "El teléfono es requerido");
    } else if telefono.len() < 8 || telefono.len() > 15 {
        errors.add("telefono", "El teléfono debe tener entre 8 y 15 caracteres");
    }
    if req.password.trim().is_empty() {
        errors.add("password", "La contraseña es requerida");
    } else if req.password.trim().len() < 6 {
        errors.add("password", "La contraseña debe tener al menos 6 caracteres");
    }
    if req.confirm_password.trim().is_empty() {
        errors.add(
            "confirmPassword",
            "La confirmación de contraseña es requerida",
        );
    } else if req.confirm_password.trim() != req.password.trim() {
        errors.add("confirmPassword", "Las contraseñas no coinciden");
    }

    errors.into_result()
}

pub fn validar_login(req: &LoginRequest) -> Result<()> {
    let mut errors = FieldErrors::new();

    if req.email.trim().is_empty() {
        errors.add("email", "El email es requerido");
    } else if !email_valido(&req.email) {
        errors.add("email", "Email inválido");
    }
    if req.password.trim().is_empty() {
        errors.add("password", "La contraseña es requerida");
    }

    errors.into_result()
}

pub fn validar_cabana(req: &CabanaRequest) -> Result<()> {
    let mut errors = FieldErrors::new();

    if req.nombre.trim().is_empty() {
        errors.add("nombre", "El nombre es requerido");
    }
    if req.descripcion.trim().is_empty() {
        errors.add("descripcion", "La descripción es requerida");
    }
    if !(req.precio > 0.0) {
        errors.add("precio", "El precio debe ser mayor a 0");
    }
    if req.capacidad <= 0 {
        errors.add("capacidad", "La capacidad debe ser mayor a 0");
    }
    if let Some(imagen) = req.imagen.as_deref()
        && Url::parse(imagen).is_err()
    {
        errors.add("imagen", "La imagen debe ser una URL válida");
    }

    errors.into_result()
}

pub fn validar_servicio(req: &ServicioRequest) -> Result<()> {
    let mut errors = FieldErrors::new();

    if req.nombre.trim().is_empty() {
        errors.add("nombre", "El nombre es requerido");
    }
    if req.precio < 0.0 || !req.precio.is_finite() {
        errors.add("precio", "El precio debe ser un número positivo");
    }

    errors.into_result()
}

fn parsear_fecha(
    valor: Option<&str>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    match valor {
        None => {
            errors.add(field, "La fecha es requerida");
            None
        }
        Some(v) => match NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d") {
            Ok(fecha) => Some(fecha),
            Err(_) => {
                errors.add(field, "Formato de fecha inválido (YYYY-MM-DD)");
                None
            }
        },
    }
}

fn validar_rango_fechas(
    inicio: NaiveDate,
    fin: NaiveDate,
    hoy: NaiveDate,
    errors: &mut FieldErrors,
) {
    if inicio < hoy {
        errors.add("fechaInicio", "La fecha de inicio no puede ser en el pasado");
    }
    if fin <= inicio {
        errors.add(
            "fechaFin",
            "La fecha de fin debe ser posterior a la fecha de inicio",
        );
    }
}

/// Validates the availability search query. `hoy` is injected so the
/// past-date rule is testable.
pub fn validar_disponibilidad(
    query: &DisponibilidadQuery,
    hoy: NaiveDate,
) -> Result<Disponibilidad> {
    let mut errors = FieldErrors::new();

    let inicio = parsear_fecha(query.fecha_inicio.as_deref(), "fechaInicio", &mut errors);
    let fin = parsear_fecha(query.fecha_fin.as_deref(), "fechaFin", &mut errors);

    if let (Some(inicio), Some(fin)) = (inicio, fin) {
        validar_rango_fechas(inicio, fin, hoy, &mut errors);
    }

    let adultos = query.adultos.unwrap_or(1);
    if adultos < 1 {
        errors.add("adultos", "Debe haber al menos 1 adulto");
    } else if adultos > MAX_OCUPANTES {
        errors.add(
            "adultos",
            &format!("El número de adultos no puede superar {MAX_OCUPANTES}"),
        );
    }
    let ninos = query.ninos.unwrap_or(0);
    if ninos < 0 {
        errors.add("ninos", "El número de niños no puede ser negativo");
    } else if ninos > MAX_OCUPANTES {
        errors.add(
            "ninos",
            &format!("El número de niños no puede superar {MAX_OCUPANTES}"),
        );
    }

    errors.into_result()?;

    Ok(Disponibilidad {
        // into_result already rejected the None cases
        fecha_inicio: inicio.ok_or_else(|| Error::Internal("fecha sin validar".to_string()))?,
        fecha_fin: fin.ok_or_else(|| Error::Internal("fecha sin validar".to_string()))?,
        adultos,
        ninos,
    })
}

/// Validated reservation input: cabin id, date range and occupant counts.
#[derive(Debug)]
pub struct ReservaValidada {
    pub cabana_id: i32,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub adultos: i32,
    pub ninos: i32,
}

pub fn validar_reserva(req: &CrearReservaRequest, hoy: NaiveDate) -> Result<ReservaValidada> {
    let mut errors = FieldErrors::new();

    let cabana_id = match req.cabana_id {
        Some(id) if id > 0 => Some(id),
        Some(_) => {
            errors.add("cabana_id", "ID de cabaña inválido");
            None
        }
        None => {
            errors.add("cabana_id", "El ID de la cabaña es requerido");
            None
        }
    };

    let inicio = parsear_fecha(req.fecha_inicio.as_deref(), "fecha_inicio", &mut errors);
    let fin = parsear_fecha(req.fecha_fin.as_deref(), "fecha_fin", &mut errors);
    if let (Some(inicio), Some(fin)) = (inicio, fin) {
        if inicio < hoy {
            errors.add("fecha_inicio", "La fecha de inicio no puede ser en el pasado");
        }
        if fin <= inicio {
            errors.add(
                "fecha_fin",
                "La fecha de fin debe ser posterior a la fecha de inicio",
            );
        }
    }

    let adultos = match req.adultos {
        Some(n) if (1..=MAX_OCUPANTES).contains(&n) => Some(n),
        Some(n) if n > MAX_OCUPANTES => {
            errors.add(
                "adultos",
                &format!("El número de adultos no puede superar {MAX_OCUPANTES}"),
            );
            None
        }
        Some(_) => {
            errors.add("adultos", "Debe haber al menos 1 adulto");
            None
        }
        None => {
            errors.add("adultos", "El número de adultos es requerido");
            None
        }
    };
    let ninos = req.ninos.unwrap_or(0);
    if ninos < 0 {
        errors.add("ninos", "El número de niños no puede ser negativo");
    } else if ninos > MAX_OCUPANTES {
        errors.add(
            "ninos",
            &format!("El número de niños no puede superar {MAX_OCUPANTES}"),
        );
    }
    if req.servicios.iter().any(|&id| id <= 0) {
        errors.add("servicios", "Los servicios deben ser IDs válidos");
    }
    let mut vistos = HashSet::new();
    if req.servicios.iter().any(|id| !vistos.insert(*id)) {
        errors.add("servicios", "Los servicios no deben repetirse");
    }

    errors.into_result()?;

    Ok(ReservaValidada {
        cabana_id: cabana_id.ok_or_else(|| Error::Internal("cabana_id sin validar".to_string()))?,
        fecha_inicio: inicio.ok_or_else(|| Error::Internal("fecha sin validar".to_string()))?,
        fecha_fin: fin.ok_or_else(|| Error::Internal("fecha sin validar".to_string()))?,
        adultos: adultos.ok_or_else(|| Error::Internal("adultos sin validar".to_string()))?,
        ninos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registro_ok() -> RegistroRequest {
        RegistroRequest {
            nombre: "Ana".to_string(),
            apellido: "Rojas".to_string(),
            email: "ana@example.com".to_string(),
            telefono: "123456789".to_string(),
            password: "secreta1".to_string(),
            confirm_password: "secreta1".to_string(),
        }
    }

    fn hoy() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    #[test]
    fn test_email_valido() {
        assert!(email_valido("user@example.com"));
        assert!(email_valido("test.email+tag@domain.co.uk"));
        assert!(!email_valido(""));
        assert!(!email_valido("sin-arroba"));
        assert!(!email_valido("@domain.com"));
        assert!(!email_valido("user@"));
        assert!(!email_valido("user@@domain.com"));
        assert!(!email_valido("user@domain"));
        assert!(!email_valido("user name@domain.com"));
        assert!(!email_valido("user@domain..com"));
    }

    #[test]
    fn test_validar_registro_ok() {
        assert!(validar_registro(&registro_ok()).is_ok());
    }

    #[test]
    fn test_validar_registro_collects_all_fields() {
        let req = RegistroRequest {
            nombre: "".to_string(),
            apellido: "".to_string(),
            email: "no-es-email".to_string(),
            telefono: "123".to_string(),
            password: "abc".to_string(),
            confirm_password: "otra".to_string(),
        };
        let err = validar_registro(&req).unwrap_err();
        match err {
            crate::error::Error::Validation(ValidationErrors::Multiple { fields }) => {
                assert_eq!(fields.len(), 6);
                assert_eq!(fields["email"], "Email inválido");
                assert_eq!(fields["confirmPassword"], "Las contraseñas no coinciden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validar_registro_password_corta() {
        let mut req = registro_ok();
        req.password = "corta".to_string();
        req.confirm_password = "corta".to_string();
        assert!(validar_registro(&req).is_err());
    }

    #[test]
    fn test_validar_cabana() {
        let mut req = CabanaRequest {
            nombre: "Del Bosque".to_string(),
            descripcion: "Cabaña con vista al lago".to_string(),
            precio: 120.0,
            capacidad: 4,
            imagen: None,
            disponible: None,
            destacada: None,
        };
        assert!(validar_cabana(&req).is_ok());

        req.precio = 0.0;
        assert!(validar_cabana(&req).is_err());

        req.precio = 120.0;
        req.imagen = Some("no-es-url".to_string());
        assert!(validar_cabana(&req).is_err());

        req.imagen = Some("https://example.com/foto.jpg".to_string());
        assert!(validar_cabana(&req).is_ok());
    }

    #[test]
    fn test_validar_disponibilidad() {
        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: Some(2),
            ninos: Some(1),
        };
        let disp = validar_disponibilidad(&query, hoy()).unwrap();
        assert_eq!(disp.adultos, 2);
        assert_eq!(disp.ninos, 1);
        assert_eq!(
            disp.fecha_inicio,
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
        );
    }

    #[test]
    fn test_validar_disponibilidad_defaults() {
        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: None,
            ninos: None,
        };
        let disp = validar_disponibilidad(&query, hoy()).unwrap();
        assert_eq!(disp.adultos, 1);
        assert_eq!(disp.ninos, 0);
    }

    #[test]
    fn test_validar_disponibilidad_fechas_invalidas() {
        // Start in the past
        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-07-01".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: None,
            ninos: None,
        };
        assert!(validar_disponibilidad(&query, hoy()).is_err());

        // End not after start
        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-10".to_string()),
            adultos: None,
            ninos: None,
        };
        assert!(validar_disponibilidad(&query, hoy()).is_err());

        // Garbage format
        let query = DisponibilidadQuery {
            fecha_inicio: Some("10/08/2026".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: None,
            ninos: None,
        };
        assert!(validar_disponibilidad(&query, hoy()).is_err());
    }

    #[test]
    fn test_validar_disponibilidad_ocupantes_excesivos() {
        // A huge count must be rejected here: the handler adds adultos and
        // ninos to get the party size, and that sum must never wrap.
        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: Some(i32::MAX),
            ninos: Some(1),
        };
        let err = validar_disponibilidad(&query, hoy()).unwrap_err();
        match err {
            crate::error::Error::Validation(ValidationErrors::Multiple { fields }) => {
                assert_eq!(fields["adultos"], "El número de adultos no puede superar 20");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: Some(2),
            ninos: Some(21),
        };
        assert!(validar_disponibilidad(&query, hoy()).is_err());

        // The caps themselves are still fine
        let query = DisponibilidadQuery {
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-15".to_string()),
            adultos: Some(20),
            ninos: Some(20),
        };
        assert!(validar_disponibilidad(&query, hoy()).is_ok());
    }

    #[test]
    fn test_validar_reserva() {
        let req = CrearReservaRequest {
            cabana_id: Some(3),
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-12".to_string()),
            adultos: Some(2),
            ninos: None,
            servicios: vec![1, 2],
        };
        let validada = validar_reserva(&req, hoy()).unwrap();
        assert_eq!(validada.cabana_id, 3);
        assert_eq!(validada.ninos, 0);
    }

    #[test]
    fn test_validar_reserva_rechazos() {
        let base = CrearReservaRequest {
            cabana_id: Some(3),
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-12".to_string()),
            adultos: Some(2),
            ninos: None,
            servicios: vec![],
        };

        let mut req = base.clone();
        req.cabana_id = None;
        assert!(validar_reserva(&req, hoy()).is_err());

        let mut req = base.clone();
        req.adultos = Some(0);
        assert!(validar_reserva(&req, hoy()).is_err());

        let mut req = base.clone();
        req.ninos = Some(-1);
        assert!(validar_reserva(&req, hoy()).is_err());

        let mut req = base.clone();
        req.adultos = Some(i32::MAX);
        assert!(validar_reserva(&req, hoy()).is_err());

        let mut req = base.clone();
        req.ninos = Some(i32::MAX);
        assert!(validar_reserva(&req, hoy()).is_err());

        let mut req = base.clone();
        req.servicios = vec![0];
        assert!(validar_reserva(&req, hoy()).is_err());

        let mut req = base;
        req.fecha_fin = Some("2026-08-09".to_string());
        assert!(validar_reserva(&req, hoy()).is_err());
    }

    #[test]
    fn test_validar_reserva_servicios_repetidos() {
        // A repeated id would be charged twice and then collide with the
        // reserva_servicios primary key, so it is rejected up front.
        let req = CrearReservaRequest {
            cabana_id: Some(3),
            fecha_inicio: Some("2026-08-10".to_string()),
            fecha_fin: Some("2026-08-12".to_string()),
            adultos: Some(2),
            ninos: None,
            servicios: vec![1, 2, 1],
        };
        let err = validar_reserva(&req, hoy()).unwrap_err();
        match err {
            crate::error::Error::Validation(ValidationErrors::Multiple { fields }) => {
                assert_eq!(fields["servicios"], "Los servicios no deben repetirse");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
