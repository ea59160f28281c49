//! Transactions, inputs and outputs: wire forms, sizes and identity.

#![allow(missing_docs)]

use chain::hash::{sha256d, Hash};
use chain::point::Point;
use error::Result;
use serial::{varint_size, Reader, Writer};

/// A transaction input: the spent point, unlock script, witness stack
/// and sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
	pub point: Point,
	pub script: Vec<u8>,
	pub witness: Vec<Vec<u8>>,
	pub sequence: u32,
}

impl Input {
	fn write(&self, writer: &mut Writer) {
		self.point.write(writer);
		writer.write_varbytes(&self.script);
		writer.write_u32(self.sequence);
	}

	fn read(reader: &mut Reader) -> Result<Input> {
		Ok(Input {
			point: Point::read(reader)?,
			script: reader.read_varbytes()?.to_vec(),
			witness: Vec::new(),
			sequence: reader.read_u32()?,
		})
	}

	fn write_witness(&self, writer: &mut Writer) {
		writer.write_varint(self.witness.len() as u64);
		for item in &self.witness {
			writer.write_varbytes(item);
		}
	}

	fn read_witness(&mut self, reader: &mut Reader) -> Result<()> {
		let count = reader.read_varint()? as usize;
		self.witness = Vec::with_capacity(count);
		for _ in 0..count {
			self.witness.push(reader.read_varbytes()?.to_vec());
		}
		Ok(())
	}

	fn base_size(&self) -> usize {
		36 + varint_size(self.script.len() as u64) + self.script.len() + 4
	}

	fn witness_size(&self) -> usize {
		varint_size(self.witness.len() as u64)
			+ self.witness.iter()
				.map(|item| varint_size(item.len() as u64) + item.len())
				.sum::<usize>()
	}
}

/// A transaction output: value plus lock script.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
	pub value: u64,
	pub script: Vec<u8>,
}

impl Output {
	fn write(&self, writer: &mut Writer) {
		writer.write_u64(self.value);
		writer.write_varbytes(&self.script);
	}

	fn read(reader: &mut Reader) -> Result<Output> {
		Ok(Output {
			value: reader.read_u64()?,
			script: reader.read_varbytes()?.to_vec(),
		})
	}

	fn size(&self) -> usize {
		8 + varint_size(self.script.len() as u64) + self.script.len()
	}

	/// sha256 of the lock script, the key of the address index.
	pub fn script_hash(&self) -> Hash {
		use sha2::{Digest, Sha256};
		Sha256::digest(&self.script).into()
	}
}

const WITNESS_MARKER: u8 = 0x00;
const WITNESS_FLAG: u8 = 0x01;

/// A transaction. Identity is the hash of the witness-stripped form;
/// the witness variant is available where needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
	pub version: u32,
	pub inputs: Vec<Input>,
	pub outputs: Vec<Output>,
	pub locktime: u32,
}

impl Transaction {
	/// One input carrying the null point.
	pub fn is_coinbase(&self) -> bool {
		self.inputs.len() == 1 && self.inputs[0].point.is_null()
	}

	pub fn has_witness(&self) -> bool {
		self.inputs.iter().any(|input| !input.witness.is_empty())
	}

	pub fn write(&self, writer: &mut Writer, witness: bool) {
		let witness = witness && self.has_witness();
		writer.write_u32(self.version);
		if witness {
			writer.write_u8(WITNESS_MARKER);
			writer.write_u8(WITNESS_FLAG);
		}
		writer.write_varint(self.inputs.len() as u64);
		for input in &self.inputs {
			input.write(writer);
		}
		writer.write_varint(self.outputs.len() as u64);
		for output in &self.outputs {
			output.write(writer);
		}
		if witness {
			for input in &self.inputs {
				input.write_witness(writer);
			}
		}
		writer.write_u32(self.locktime);
	}

	pub fn to_bytes(&self, witness: bool) -> Vec<u8> {
		let mut writer = Writer::with_capacity(self.serialized_size(witness));
		self.write(&mut writer, witness);
		writer.into_vec()
	}

	pub fn read(reader: &mut Reader) -> Result<Transaction> {
		let version = reader.read_u32()?;

		let mut count = reader.read_varint()?;
		let mut segregated = false;
		if count == WITNESS_MARKER as u64 {
			// A zero input count marks a segregated witness encoding.
			let flag = reader.read_u8()?;
			debug_assert_eq!(flag, WITNESS_FLAG);
			segregated = true;
			count = reader.read_varint()?;
		}

		let mut inputs = Vec::with_capacity(count as usize);
		for _ in 0..count {
			inputs.push(Input::read(reader)?);
		}

		let count = reader.read_varint()?;
		let mut outputs = Vec::with_capacity(count as usize);
		for _ in 0..count {
			outputs.push(Output::read(reader)?);
		}

		if segregated {
			for input in &mut inputs {
				input.read_witness(reader)?;
			}
		}

		Ok(Transaction {
			version,
			inputs,
			outputs,
			locktime: reader.read_u32()?,
		})
	}

	/// Byte length of the wire form, with or without witness data.
	pub fn serialized_size(&self, witness: bool) -> usize {
		let witness = witness && self.has_witness();
		let mut size = 4 + 4;
		if witness {
			size += 2;
		}
		size += varint_size(self.inputs.len() as u64);
		size += self.inputs.iter().map(Input::base_size).sum::<usize>();
		size += varint_size(self.outputs.len() as u64);
		size += self.outputs.iter().map(Output::size).sum::<usize>();
		if witness {
			size += self.inputs.iter().map(Input::witness_size).sum::<usize>();
		}
		size
	}

	/// Identity hash over the witness-stripped form.
	pub fn hash(&self) -> Hash {
		sha256d(&self.to_bytes(false))
	}

	/// Hash over the witness form.
	pub fn witness_hash(&self) -> Hash {
		sha256d(&self.to_bytes(true))
	}
}
