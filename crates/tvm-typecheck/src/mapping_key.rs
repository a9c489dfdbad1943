//! Bit-layout validation for struct-typed mapping keys. Such a key is
//! serialized field by field into a single cell, so every field must have a
//! fixed-width numeric-like encoding and the widths must sum to at most
//! `CELL_BIT_LENGTH`.

use tvm_model::ast::MappingNode;
use tvm_model::model::GlobalEnv;
use tvm_model::ty::{Type, CELL_BIT_LENGTH};

pub fn check_mapping_key(env: &GlobalEnv, mapping: &MappingNode) {
    let struct_id = match &mapping.key_ty {
        Type::Struct(id) => *id,
        _ => return,
    };

    let struct_env = env.get_struct(struct_id);
    let mut bit_length = 0;
    for field in struct_env.fields() {
        // Keys are validated one level deep: a struct-typed field fails the
        // category test instead of being unpacked recursively.
        match field.ty.bit_width(env) {
            Some(width) => bit_length += width,
            None => {
                env.error_with_labels(
                    &mapping.loc,
                    "If struct type is used as a key type for mapping, then fields of the \
                     struct must have integer, boolean, fixed bytes or enum type",
                    vec![(field.loc, "Bad field: ".to_string())],
                );
            }
        }
    }

    // Runs even if some fields already failed the category check.
    if bit_length > CELL_BIT_LENGTH {
        env.error(
            &mapping.loc,
            &format!(
                "If struct type is used as a key type for mapping, then struct must fit in {} bits",
                CELL_BIT_LENGTH
            ),
        );
    }
}
