//! Dynamic ABI codec built on alloy-dyn-abi
//!
//! Arguments are validated against the declared parameter types before
//! anything is encoded, so a domain violation surfaces locally and never
//! reaches the wire.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::I256;

use crate::abi::{FunctionSpec, ParamSpec};
use crate::error::{Error, Result};

/// Encode calldata for `function`: selector followed by ABI-encoded
/// arguments. Fails with `Error::Encoding` if an argument does not fit
/// the declared type's domain.
pub fn encode_input(function: &FunctionSpec, args: &[DynSolValue]) -> Result<Vec<u8>> {
    let types = parse_types(&function.inputs)?;

    if args.len() != types.len() {
        return Err(Error::encoding(
            &function.name,
            format!("expected {} arguments, got {}", types.len(), args.len()),
        ));
    }

    for (index, (ty, value)) in types.iter().zip(args).enumerate() {
        check_value(ty, value).map_err(|reason| {
            Error::encoding(&function.name, format!("argument {index}: {reason}"))
        })?;
    }

    let mut calldata = function.selector.to_vec();
    if !args.is_empty() {
        let tuple = DynSolValue::Tuple(args.to_vec());
        calldata.extend_from_slice(&tuple.abi_encode_params());
    }

    Ok(calldata)
}

/// Decode the arguments of `function` from full calldata, selector
/// included. The selector must match the declared signature.
pub fn decode_input(function: &FunctionSpec, data: &[u8]) -> Result<Vec<DynSolValue>> {
    if data.len() < 4 {
        return Err(Error::decoding(
            &function.name,
            "calldata shorter than a selector",
        ));
    }
    if data[..4] != function.selector {
        return Err(Error::decoding(
            &function.name,
            format!(
                "selector mismatch: got 0x{}, expected {}",
                hex::encode(&data[..4]),
                function.selector_hex()
            ),
        ));
    }

    decode_values(&function.name, &function.inputs, &data[4..])
}

/// Decode the return data of `function` against its declared outputs.
/// Fails with `Error::Decoding` on any length or shape mismatch; never
/// silently truncates.
pub fn decode_output(function: &FunctionSpec, data: &[u8]) -> Result<Vec<DynSolValue>> {
    decode_values(&function.name, &function.outputs, data)
}

fn decode_values(function: &str, params: &[ParamSpec], data: &[u8]) -> Result<Vec<DynSolValue>> {
    let types = parse_types(params)?;

    if types.is_empty() {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        return Err(Error::decoding(
            function,
            format!("{} unexpected bytes for an empty shape", data.len()),
        ));
    }

    // Wrap in a tuple so multi-value shapes decode in one pass
    let tuple = DynSolType::Tuple(types);
    let decoded = tuple
        .abi_decode(data)
        .map_err(|err| Error::decoding(function, err.to_string()))?;

    match decoded {
        DynSolValue::Tuple(values) => Ok(values),
        other => Ok(vec![other]),
    }
}

fn parse_types(params: &[ParamSpec]) -> Result<Vec<DynSolType>> {
    params
        .iter()
        .map(|param| {
            param.kind.parse::<DynSolType>().map_err(|err| {
                Error::Abi(format!("bad type `{}` for `{}`: {}", param.kind, param.name, err))
            })
        })
        .collect()
}

/// Check that `value` lies in the domain of the declared type: matching
/// kind, numeric range within the declared bit width, exact lengths for
/// fixed-size shapes.
fn check_value(ty: &DynSolType, value: &DynSolValue) -> std::result::Result<(), String> {
    match (ty, value) {
        (DynSolType::Address, DynSolValue::Address(_)) => Ok(()),
        (DynSolType::Function, DynSolValue::Function(_)) => Ok(()),
        (DynSolType::Bool, DynSolValue::Bool(_)) => Ok(()),
        (DynSolType::String, DynSolValue::String(_)) => Ok(()),
        (DynSolType::Bytes, DynSolValue::Bytes(_)) => Ok(()),

        (DynSolType::Uint(bits), DynSolValue::Uint(uint, _)) => {
            if uint.bit_len() > *bits {
                Err(format!("{uint} exceeds uint{bits}"))
            } else {
                Ok(())
            }
        }

        (DynSolType::Int(bits), DynSolValue::Int(int, _)) => {
            if int_in_range(*int, *bits) {
                Ok(())
            } else {
                Err(format!("{int} exceeds int{bits}"))
            }
        }

        (DynSolType::FixedBytes(size), DynSolValue::FixedBytes(_, got)) => {
            if got == size {
                Ok(())
            } else {
                Err(format!("expected bytes{size}, got bytes{got}"))
            }
        }

        (DynSolType::FixedArray(inner, size), DynSolValue::FixedArray(values)) => {
            if values.len() != *size {
                return Err(format!("expected {size} elements, got {}", values.len()));
            }
            for value in values {
                check_value(inner, value)?;
            }
            Ok(())
        }

        (DynSolType::Array(inner), DynSolValue::Array(values)) => {
            for value in values {
                check_value(inner, value)?;
            }
            Ok(())
        }

        (DynSolType::Tuple(types), DynSolValue::Tuple(values)) => {
            if types.len() != values.len() {
                return Err(format!(
                    "expected {} tuple fields, got {}",
                    types.len(),
                    values.len()
                ));
            }
            for (ty, value) in types.iter().zip(values) {
                check_value(ty, value)?;
            }
            Ok(())
        }

        (ty, value) => Err(format!(
            "expected {}, got {}",
            ty.sol_type_name(),
            value
                .sol_type_name()
                .unwrap_or_else(|| "unknown".into())
        )),
    }
}

fn int_in_range(value: I256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let bound = I256::ONE << (bits - 1);
    value >= -bound && value < bound
}
